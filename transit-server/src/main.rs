use std::error::Error;
use std::net::SocketAddr;

use tracing::{info, warn};

use transit_server::logger::init_logger;
use transit_server::network::{NetworkDefinition, default_city};
use transit_server::planner::RoutingConfig;
use transit_server::web::{AppState, create_router};

const BIND_ADDR_VAR: &str = "TRANSIT_BIND_ADDR";
const NETWORK_FILE_VAR: &str = "TRANSIT_NETWORK_FILE";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logger();

    let config = RoutingConfig::from_env()?;
    info!(
        transfer_penalty = config.transfer_penalty,
        minutes_per_hop = config.minutes_per_hop,
        minutes_per_transfer = config.minutes_per_transfer,
        "routing config"
    );

    // Load the network from file if given, else the built-in city
    let definition = match std::env::var(NETWORK_FILE_VAR) {
        Ok(path) => {
            info!(%path, "loading network definition");
            NetworkDefinition::from_path(&path)?
        }
        Err(_) => {
            info!("using built-in city");
            default_city()
        }
    };
    let network = definition.build()?;
    info!(
        lines = network.lines().len(),
        stops = network.stops().count(),
        "network ready"
    );

    let state = AppState::new(network, config);
    let app = create_router(state);

    let addr: SocketAddr = std::env::var(BIND_ADDR_VAR)
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "transit route planner listening");
    info!("  GET  /health                 - Health check");
    info!("  GET  /api/network            - Lines and stops");
    info!("  PUT  /api/nodes/:id/status   - Set a stop in or out of service");
    info!("  POST /api/nodes/:id/toggle   - Toggle maintenance on a stop");
    info!("  GET  /api/disruptions        - List stops out of service");
    info!("  DELETE /api/disruptions      - Put every stop back in service");
    info!("  POST /api/route              - Plan a route");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
