//! Network model: the street grid, its transit lines, and the line-tagged
//! multigraph the router searches.
//!
//! A network is assembled once with [`NetworkBuilder`] (directly, from a
//! JSON [`NetworkDefinition`], or via [`default_city`]) and is read-only
//! from then on.

mod builder;
mod city;
mod definition;
mod error;
mod stops;

use std::collections::{BTreeMap, HashMap};

use crate::domain::{Line, LineId, Node, NodeId};

pub use builder::{MAX_GRID_BLOCKS, NetworkBuilder, expand_waypoints};
pub use city::default_city;
pub use definition::{LineDefinition, NetworkDefinition, RandomStops, StopDefinition};
pub use error::NetworkError;
pub use stops::zone_name;

/// One way of travelling from a node to a neighbour: a hop on a given line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeOption {
    /// Cost of the hop, in blocks.
    pub weight: u32,
    /// Line providing the hop.
    pub line: LineId,
}

/// `from -> to -> options`, one option per line serving the pair.
///
/// Ordered maps keep neighbour iteration, and therefore tie-breaking in the
/// router, identical from run to run.
pub type Adjacency = BTreeMap<NodeId, BTreeMap<NodeId, Vec<EdgeOption>>>;

/// A built transit network.
#[derive(Debug, Clone)]
pub struct Network {
    cols: u16,
    rows: u16,
    /// Row-major.
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    lines: Vec<Line>,
    adjacency: Adjacency,
}

impl Network {
    /// Number of blocks across the grid.
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Number of blocks down the grid.
    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// All intersections in row-major order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    /// Boarding stops in row-major order.
    pub fn stops(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_stop)
    }

    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(id.0)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_by_code(&self, code: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.code() == code)
    }

    /// Neighbours of `node` with the edge options leading to each.
    pub fn neighbors(&self, node: &NodeId) -> impl Iterator<Item = (NodeId, &[EdgeOption])> {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, opts)| (*to, opts.as_slice())))
    }

    /// Edge options for the ordered pair `(from, to)`; empty if none.
    pub fn edge_options(&self, from: &NodeId, to: &NodeId) -> &[EdgeOption] {
        self.adjacency
            .get(from)
            .and_then(|targets| targets.get(to))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.index.get(id).map(|&idx| &mut self.nodes[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(col: u16, row: u16) -> NodeId {
        NodeId::new(col, row)
    }

    /// Two crossing lines on a 4x4 grid: L1 along row 2, L2 along col 2.
    fn crossing() -> Network {
        NetworkBuilder::new(4, 4)
            .line("L1", "East-West", "#ef4444", &[n(0, 2), n(4, 2)])
            .line("L2", "North-South", "#3b82f6", &[n(2, 0), n(2, 4)])
            .build()
            .unwrap()
    }

    #[test]
    fn grid_is_row_major() {
        let net = crossing();
        assert_eq!(net.nodes().len(), 25);
        assert_eq!(net.nodes()[0].id, n(0, 0));
        assert_eq!(net.nodes()[1].id, n(1, 0));
        assert_eq!(net.nodes()[5].id, n(0, 1));
        assert!(net.contains(&n(4, 4)));
        assert!(!net.contains(&n(5, 4)));
    }

    #[test]
    fn edges_are_stored_both_ways() {
        let net = crossing();
        let l1 = net.line_by_code("L1").unwrap().id();

        assert_eq!(
            net.edge_options(&n(0, 2), &n(1, 2)),
            &[EdgeOption { weight: 1, line: l1 }]
        );
        assert_eq!(
            net.edge_options(&n(1, 2), &n(0, 2)),
            &[EdgeOption { weight: 1, line: l1 }]
        );
        assert!(net.edge_options(&n(0, 2), &n(2, 2)).is_empty());
    }

    #[test]
    fn neighbors_of_crossing_node() {
        let net = crossing();
        let neighbours: Vec<NodeId> = net.neighbors(&n(2, 2)).map(|(v, _)| v).collect();
        assert_eq!(neighbours, vec![n(1, 2), n(2, 1), n(2, 3), n(3, 2)]);

        assert_eq!(net.neighbors(&n(0, 0)).count(), 0);
    }

    #[test]
    fn parallel_lines_give_multiple_options() {
        let net = NetworkBuilder::new(3, 1)
            .line("A", "A", "#000", &[n(0, 0), n(3, 0)])
            .line("B", "B", "#fff", &[n(1, 0), n(2, 0), n(2, 1)])
            .build()
            .unwrap();

        let opts = net.edge_options(&n(1, 0), &n(2, 0));
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].line, LineId(0));
        assert_eq!(opts[1].line, LineId(1));
    }

    #[test]
    fn node_lines_recorded() {
        let net = crossing();
        assert_eq!(net.node(&n(2, 2)).unwrap().lines, vec![LineId(0), LineId(1)]);
        assert_eq!(net.node(&n(0, 2)).unwrap().lines, vec![LineId(0)]);
        assert_eq!(net.node(&n(4, 2)).unwrap().lines, vec![LineId(0)]);
        assert!(net.node(&n(0, 0)).unwrap().lines.is_empty());
    }

    #[test]
    fn line_lookup() {
        let net = crossing();
        assert_eq!(net.lines().len(), 2);
        assert_eq!(net.line(LineId(1)).unwrap().code(), "L2");
        assert!(net.line(LineId(2)).is_none());
        assert!(net.line_by_code("L9").is_none());
    }
}
