//! Domain error types.
//!
//! These errors represent validation failures in the network model.
//! They are distinct from routing and HTTP errors.

use super::NodeId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A line needs at least two nodes
    #[error("line {0} must visit at least two nodes")]
    LineTooShort(String),

    /// A line visits the same node twice
    #[error("line {line} visits {node} more than once")]
    RepeatedNode { line: String, node: NodeId },

    /// Consecutive nodes on a line are not one block apart
    #[error("line {line} jumps from {from} to {to}")]
    NotAdjacent {
        line: String,
        from: NodeId,
        to: NodeId,
    },

    /// Node lies outside the grid
    #[error("node {0} is outside the grid")]
    OutsideGrid(NodeId),
}
