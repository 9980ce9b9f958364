//! Domain types for the transit planner.
//!
//! This module contains the core value types of the network model. All
//! types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod error;
mod line;
mod node;

pub use error::DomainError;
pub use line::{Line, LineId};
pub use node::{InvalidNodeId, Node, NodeId};
