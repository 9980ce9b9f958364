//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::NodeId;
use crate::planner::{self, Itinerary, ItineraryError, RouteError};
use crate::status::StatusError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/network", get(network))
        .route("/api/nodes/:id/status", get(node_status).put(set_node_status))
        .route("/api/nodes/:id/toggle", post(toggle_node))
        .route("/api/disruptions", get(disruptions).delete(clear_disruptions))
        .route("/api/route", post(plan_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Lines, stops and their current status.
async fn network(State(state): State<AppState>) -> Json<NetworkResponse> {
    Json(NetworkResponse::from_network(&state.network, &state.status))
}

/// Parse a node id from a request, as a 400 on failure.
fn parse_node(value: &str) -> Result<NodeId, AppError> {
    NodeId::parse(value).map_err(|e| AppError::BadRequest {
        message: format!("invalid node id {value:?}: {e}"),
    })
}

/// Current status of one node.
async fn node_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let node = parse_node(&id)?;
    let out_of_service = state
        .status
        .get(node)
        .ok_or(StatusError::UnknownNode(node))?;

    Ok(Json(StatusResponse {
        node: node.to_string(),
        out_of_service,
    }))
}

/// Put a node in or out of service.
async fn set_node_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let node = parse_node(&id)?;
    let Json(req) = payload?;

    state.status.set_out_of_service(node, req.out_of_service)?;

    Ok(Json(StatusResponse {
        node: node.to_string(),
        out_of_service: req.out_of_service,
    }))
}

/// Flip a node's status (maintenance mode).
async fn toggle_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let node = parse_node(&id)?;
    let out_of_service = state.status.toggle(node)?;

    Ok(Json(StatusResponse {
        node: node.to_string(),
        out_of_service,
    }))
}

/// Every stop currently out of service.
async fn disruptions(State(state): State<AppState>) -> Json<DisruptionsResponse> {
    Json(DisruptionsResponse::from_nodes(&state.status.disrupted()))
}

/// Put every stop back in service; returns the stops that were closed.
async fn clear_disruptions(State(state): State<AppState>) -> Json<DisruptionsResponse> {
    let cleared = state.status.disrupted();
    state.status.clear();
    info!(count = cleared.len(), "cleared all disruptions");
    Json(DisruptionsResponse::from_nodes(&cleared))
}

/// Plan the cheapest route between two nodes.
async fn plan_route(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<RouteResponse>, AppError> {
    let Json(req) = payload?;
    let start = parse_node(&req.start)?;
    let end = parse_node(&req.end)?;

    let router = planner::Router::new(&state.network, state.status.as_ref(), &state.config);
    let Some(route) = router.find_route(start, end)? else {
        info!(%start, %end, "no route: blocked by maintenance");
        return Ok(Json(RouteResponse::blocked()));
    };

    let itinerary = Itinerary::from_route(&route, &state.config)?;
    info!(
        %start,
        %end,
        cost = route.cost(),
        transfers = route.transfer_count(),
        "route planned"
    );

    Ok(Json(RouteResponse {
        route: Some(RouteResult::from_route(&route, &itinerary, &state.network)),
        message: None,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StatusError> for AppError {
    fn from(e: StatusError) -> Self {
        match e {
            StatusError::UnknownNode(_) => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl From<ItineraryError> for AppError {
    fn from(e: ItineraryError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, header};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use super::*;
    use crate::network::{NetworkBuilder, default_city};
    use crate::planner::RoutingConfig;

    /// L1 along row 2 and L2 along column 2, crossing at 2_2.
    fn test_state() -> AppState {
        let network = NetworkBuilder::new(4, 4)
            .line("L1", "East-West", "#ef4444", &[NodeId::new(0, 2), NodeId::new(4, 2)])
            .line("L2", "North-South", "#3b82f6", &[NodeId::new(2, 0), NodeId::new(2, 4)])
            .build()
            .unwrap();
        AppState::new(network, RoutingConfig::default())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = create_router(test_state());
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn network_lists_lines_and_stops() {
        let app = create_router(test_state());
        let (status, body) = send(&app, Method::GET, "/api/network", None).await;
        assert_eq!(status, StatusCode::OK);

        let network: NetworkResponse = json(&body);
        assert_eq!(network.lines.len(), 2);
        assert_eq!(network.lines[0].path.len(), 5);
        let crossing = network.stops.iter().find(|s| s.id == "2_2").unwrap();
        assert!(crossing.is_transfer);
        assert!(!crossing.out_of_service);
    }

    #[tokio::test]
    async fn plans_route_with_itinerary() {
        let app = create_router(test_state());
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/route",
            Some(r#"{"start": "0_2", "end": "2_0"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let response: RouteResponse = json(&body);
        assert!(response.message.is_none());
        let route = response.route.unwrap();
        assert_eq!(route.cost, 2 + 2 + 15);
        assert_eq!(route.transfers, 1);
        assert_eq!(route.segments.len(), 4);
        assert_eq!(route.itinerary.rides.len(), 2);
        assert_eq!(route.itinerary.total_minutes, 9);
    }

    #[tokio::test]
    async fn closed_crossing_blocks_route() {
        let app = create_router(test_state());

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/nodes/2_2/status",
            Some(r#"{"out_of_service": true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated: StatusResponse = json(&body);
        assert!(updated.out_of_service);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/route",
            Some(r#"{"start": "0_2", "end": "2_0"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = json(&body);
        assert_eq!(
            value,
            serde_json::json!({ "route": null, "message": "route blocked by maintenance" })
        );

        // Riding straight through the closed crossing still works
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/route",
            Some(r#"{"start": "0_2", "end": "4_2"}"#),
        )
        .await;
        let response: RouteResponse = json(&body);
        assert_eq!(response.route.unwrap().cost, 4);
    }

    #[tokio::test]
    async fn toggle_flips_status() {
        let app = create_router(test_state());

        let (status, body) = send(&app, Method::POST, "/api/nodes/1_2/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json::<StatusResponse>(&body).out_of_service);

        let (_, body) = send(&app, Method::GET, "/api/nodes/1_2/status", None).await;
        assert!(json::<StatusResponse>(&body).out_of_service);

        let (_, body) = send(&app, Method::POST, "/api/nodes/1_2/toggle", None).await;
        assert!(!json::<StatusResponse>(&body).out_of_service);
    }

    #[tokio::test]
    async fn list_and_clear_disruptions() {
        let app = create_router(test_state());

        let (status, body) = send(&app, Method::GET, "/api/disruptions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json::<DisruptionsResponse>(&body).out_of_service.is_empty());

        send(&app, Method::POST, "/api/nodes/3_2/toggle", None).await;
        send(&app, Method::POST, "/api/nodes/2_2/toggle", None).await;

        let (_, body) = send(&app, Method::GET, "/api/disruptions", None).await;
        assert_eq!(json::<DisruptionsResponse>(&body).out_of_service, vec!["2_2", "3_2"]);

        let (status, body) = send(&app, Method::DELETE, "/api/disruptions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json::<DisruptionsResponse>(&body).out_of_service, vec!["2_2", "3_2"]);

        let (_, body) = send(&app, Method::GET, "/api/disruptions", None).await;
        assert!(json::<DisruptionsResponse>(&body).out_of_service.is_empty());

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/route",
            Some(r#"{"start": "0_2", "end": "2_0"}"#),
        )
        .await;
        assert!(json::<RouteResponse>(&body).route.is_some());
    }

    #[tokio::test]
    async fn invalid_route_requests_are_bad_requests() {
        let app = create_router(test_state());

        for body in [
            r#"{"start": "0_2", "end": "0_2"}"#,
            r#"{"start": "zero", "end": "2_0"}"#,
            r#"{"start": "0_2", "end": "9_9"}"#,
            r#"{"start": "0_2"}"#,
        ] {
            let (status, bytes) = send(&app, Method::POST, "/api/route", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            let error: ErrorResponse = json(&bytes);
            assert!(!error.error.is_empty());
        }
    }

    #[tokio::test]
    async fn closed_endpoint_is_bad_request() {
        let app = create_router(test_state());
        send(&app, Method::POST, "/api/nodes/2_0/toggle", None).await;

        let (status, bytes) = send(
            &app,
            Method::POST,
            "/api/route",
            Some(r#"{"start": "0_2", "end": "2_0"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json::<ErrorResponse>(&bytes).error, "stop 2_0 is out of service");
    }

    #[tokio::test]
    async fn unknown_node_status_is_not_found() {
        let app = create_router(test_state());

        let (status, bytes) = send(&app, Method::POST, "/api/nodes/9_9/toggle", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json::<ErrorResponse>(&bytes).error, "unknown node 9_9");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/nodes/9_9/status",
            Some(r#"{"out_of_service": true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/nodes/nine/status", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn default_city_routes() {
        let network = default_city().build().unwrap();
        let app = create_router(AppState::new(network, RoutingConfig::default()));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/route",
            Some(r#"{"start": "5_5", "end": "25_25"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let route = json::<RouteResponse>(&body).route.unwrap();
        assert_eq!(route.cost, 55);
        assert_eq!(route.itinerary.total_minutes, 40 + 5);
        assert_eq!(route.itinerary.estimate_low_minutes, 41);
        assert_eq!(route.itinerary.estimate_high_minutes, 50);
    }
}
