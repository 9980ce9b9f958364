//! Service status: which stops are currently out of service.
//!
//! Disruptions are toggled from outside (maintenance mode) while routes are
//! being planned. Flags are read live on every edge the router relaxes; no
//! snapshot is taken, so a route reflects the flags as they were while it
//! was being computed.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::domain::NodeId;

/// Error from a status update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// The node does not belong to the network
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// Read access to out-of-service flags.
///
/// This abstraction allows the router to be tested with fixed disruption
/// sets.
pub trait StatusProvider {
    /// Returns true if `node` is closed to boarding, alighting and transit.
    ///
    /// Unknown nodes are reported as in service.
    fn is_out_of_service(&self, node: NodeId) -> bool;
}

/// Live per-node out-of-service flags for one network.
///
/// The set of nodes is fixed at construction; only the flags change.
#[derive(Debug, Default)]
pub struct ServiceStatus {
    flags: HashMap<NodeId, AtomicBool>,
}

impl ServiceStatus {
    /// Create a status table with every node in service.
    pub fn new(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            flags: nodes
                .into_iter()
                .map(|id| (id, AtomicBool::new(false)))
                .collect(),
        }
    }

    /// Returns the node's flag, or `None` if the node is unknown.
    pub fn get(&self, node: NodeId) -> Option<bool> {
        self.flags.get(&node).map(|f| f.load(Ordering::Acquire))
    }

    /// Mark a node out of service (`true`) or back in service (`false`).
    pub fn set_out_of_service(&self, node: NodeId, out_of_service: bool) -> Result<(), StatusError> {
        let flag = self.flags.get(&node).ok_or(StatusError::UnknownNode(node))?;
        let previous = flag.swap(out_of_service, Ordering::AcqRel);
        if previous != out_of_service {
            info!(%node, out_of_service, "service status changed");
        }
        Ok(())
    }

    /// Flip a node's flag and return the new value.
    pub fn toggle(&self, node: NodeId) -> Result<bool, StatusError> {
        let flag = self.flags.get(&node).ok_or(StatusError::UnknownNode(node))?;
        let out_of_service = !flag.fetch_xor(true, Ordering::AcqRel);
        info!(%node, out_of_service, "service status toggled");
        Ok(out_of_service)
    }

    /// Nodes currently out of service, in id order.
    pub fn disrupted(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .flags
            .iter()
            .filter(|(_, f)| f.load(Ordering::Acquire))
            .map(|(id, _)| *id)
            .collect();
        nodes.sort();
        nodes
    }

    /// Put every node back in service.
    pub fn clear(&self) {
        for flag in self.flags.values() {
            flag.store(false, Ordering::Release);
        }
    }
}

impl StatusProvider for ServiceStatus {
    fn is_out_of_service(&self, node: NodeId) -> bool {
        self.get(node).unwrap_or(false)
    }
}

impl StatusProvider for HashSet<NodeId> {
    fn is_out_of_service(&self, node: NodeId) -> bool {
        self.contains(&node)
    }
}

impl StatusProvider for BTreeSet<NodeId> {
    fn is_out_of_service(&self, node: NodeId) -> bool {
        self.contains(&node)
    }
}
