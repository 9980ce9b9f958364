//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Node, NodeId};
use crate::network::Network;
use crate::planner::{Itinerary, RideGroup, Route, RouteSegment};
use crate::status::ServiceStatus;

/// Request to plan a route.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Start node id, `"col_row"`
    pub start: String,

    /// End node id, `"col_row"`
    pub end: String,
}

/// Request to set a node's service status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub out_of_service: bool,
}

/// A node's service status.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub node: String,
    pub out_of_service: bool,
}

/// Stops currently out of service.
#[derive(Debug, Serialize, Deserialize)]
pub struct DisruptionsResponse {
    /// Node ids in id order
    pub out_of_service: Vec<String>,
}

impl DisruptionsResponse {
    pub fn from_nodes(nodes: &[NodeId]) -> Self {
        Self {
            out_of_service: nodes.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Response to a route request.
///
/// `route` is `None` when every path is blocked by closed stops.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub route: Option<RouteResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteResponse {
    pub const BLOCKED: &'static str = "route blocked by maintenance";

    /// Response for a request with no available route.
    pub fn blocked() -> Self {
        Self {
            route: None,
            message: Some(Self::BLOCKED.to_string()),
        }
    }
}

/// A found route with its itinerary.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResult {
    /// Search cost: blocks plus transfer penalties
    pub cost: u32,

    pub hops: usize,

    pub transfers: usize,

    /// One entry per block, in travel order
    pub segments: Vec<SegmentResult>,

    pub itinerary: ItineraryResult,
}

impl RouteResult {
    pub fn from_route(route: &Route, itinerary: &Itinerary, network: &Network) -> Self {
        Self {
            cost: route.cost(),
            hops: route.hop_count(),
            transfers: route.transfer_count(),
            segments: route
                .segments()
                .iter()
                .map(|s| SegmentResult::from_segment(s, network))
                .collect(),
            itinerary: ItineraryResult::from_itinerary(itinerary, network),
        }
    }
}

/// One block of a route.
#[derive(Debug, Serialize, Deserialize)]
pub struct SegmentResult {
    pub from: String,
    pub to: String,

    /// Line code, e.g. "L1"
    pub line: String,
}

impl SegmentResult {
    pub fn from_segment(segment: &RouteSegment, network: &Network) -> Self {
        Self {
            from: segment.from.to_string(),
            to: segment.to.to_string(),
            line: line_code(network, segment),
        }
    }
}

fn line_code(network: &Network, segment: &RouteSegment) -> String {
    network
        .line(segment.line)
        .map(|l| l.code().to_string())
        .unwrap_or_else(|| segment.line.to_string())
}

/// Rider-facing summary of a route.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItineraryResult {
    pub rides: Vec<RideResult>,
    pub transfers: usize,
    pub total_minutes: i64,

    /// Low end of the estimate range, minutes
    pub estimate_low_minutes: i64,

    /// High end of the estimate range, minutes
    pub estimate_high_minutes: i64,
}

impl ItineraryResult {
    pub fn from_itinerary(itinerary: &Itinerary, network: &Network) -> Self {
        let (low, high) = itinerary.estimate_range();
        Self {
            rides: itinerary
                .rides()
                .iter()
                .map(|r| RideResult::from_ride(r, network))
                .collect(),
            transfers: itinerary.transfer_count(),
            total_minutes: itinerary.total_time().num_minutes(),
            estimate_low_minutes: low.num_minutes(),
            estimate_high_minutes: high.num_minutes(),
        }
    }
}

/// One ride on one line.
#[derive(Debug, Serialize, Deserialize)]
pub struct RideResult {
    pub line: String,
    pub line_name: String,
    pub color: String,
    pub board: String,
    pub board_label: String,
    pub alight: String,
    pub alight_label: String,
    pub hops: usize,
    pub minutes: i64,
}

impl RideResult {
    pub fn from_ride(ride: &RideGroup, network: &Network) -> Self {
        let line = network.line(ride.line);
        let label = |id: NodeId| {
            network
                .node(&id)
                .map(Node::label)
                .unwrap_or_else(|| id.to_string())
        };

        Self {
            line: line.map_or_else(|| ride.line.to_string(), |l| l.code().to_string()),
            line_name: line.map(|l| l.name().to_string()).unwrap_or_default(),
            color: line.map(|l| l.color().to_string()).unwrap_or_default(),
            board: ride.board.to_string(),
            board_label: label(ride.board),
            alight: ride.alight.to_string(),
            alight_label: label(ride.alight),
            hops: ride.hops,
            minutes: ride.duration.num_minutes(),
        }
    }
}

/// The whole network as drawn on a map.
#[derive(Debug, Serialize, Deserialize)]
pub struct NetworkResponse {
    pub cols: u16,
    pub rows: u16,
    pub lines: Vec<LineResult>,
    pub stops: Vec<StopResult>,
}

impl NetworkResponse {
    pub fn from_network(network: &Network, status: &ServiceStatus) -> Self {
        Self {
            cols: network.cols(),
            rows: network.rows(),
            lines: network.lines().iter().map(LineResult::from_line).collect(),
            stops: network
                .stops()
                .map(|n| StopResult::from_node(n, network, status))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineResult {
    pub code: String,
    pub name: String,
    pub color: String,

    /// Every node on the line, in order
    pub path: Vec<String>,
}

impl LineResult {
    pub fn from_line(line: &Line) -> Self {
        Self {
            code: line.code().to_string(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            path: line.stops().iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StopResult {
    pub id: String,
    pub label: String,

    /// Codes of the lines serving this stop
    pub lines: Vec<String>,

    pub is_transfer: bool,
    pub out_of_service: bool,
}

impl StopResult {
    pub fn from_node(node: &Node, network: &Network, status: &ServiceStatus) -> Self {
        Self {
            id: node.id.to_string(),
            label: node.label(),
            lines: node
                .lines
                .iter()
                .filter_map(|id| network.line(*id))
                .map(|l| l.code().to_string())
                .collect(),
            is_transfer: node.is_transfer,
            out_of_service: status.get(node.id).unwrap_or(false),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
