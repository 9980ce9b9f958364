//! Application state for the web layer.

use std::sync::Arc;

use crate::network::Network;
use crate::planner::RoutingConfig;
use crate::status::ServiceStatus;

/// Shared application state.
///
/// The network and config are fixed once the server starts; only the
/// service status flags change between requests.
#[derive(Clone)]
pub struct AppState {
    /// The transit network
    pub network: Arc<Network>,

    /// Live out-of-service flags for every node
    pub status: Arc<ServiceStatus>,

    /// Routing and time estimate configuration
    pub config: Arc<RoutingConfig>,
}

impl AppState {
    /// Create a new app state with every node in service.
    pub fn new(network: Network, config: RoutingConfig) -> Self {
        let status = ServiceStatus::new(network.node_ids());
        Self {
            network: Arc::new(network),
            status: Arc::new(status),
            config: Arc::new(config),
        }
    }
}
