//! Network construction.

use std::collections::HashMap;

use tracing::debug;

use super::stops::{self, DEFAULT_TRANSFER_SPACING};
use super::{Adjacency, EdgeOption, Network, NetworkError};
use crate::domain::{DomainError, Line, LineId, Node, NodeId};

/// Largest grid, in blocks along either axis, a network may span.
pub const MAX_GRID_BLOCKS: u16 = 1000;

/// A line waiting to be expanded and validated.
#[derive(Debug, Clone)]
struct PendingLine {
    code: String,
    name: String,
    color: String,
    waypoints: Vec<NodeId>,
}

/// Builder for a [`Network`].
///
/// Provides a fluent API; all validation happens in [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use transit_server::domain::NodeId;
/// use transit_server::network::NetworkBuilder;
///
/// let network = NetworkBuilder::new(10, 10)
///     .line("L1", "North", "#ef4444", &[NodeId::new(0, 5), NodeId::new(10, 5)])
///     .stop(NodeId::new(3, 5), "Plaza Sun")
///     .build()
///     .unwrap();
///
/// assert_eq!(network.lines()[0].len(), 11);
/// assert_eq!(network.stops().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    cols: u16,
    rows: u16,
    transfer_spacing: u32,
    lines: Vec<PendingLine>,
    stops: Vec<(NodeId, String)>,
    random_stops: Option<(usize, u64)>,
}

impl NetworkBuilder {
    /// Start a network on a grid `cols` blocks wide and `rows` blocks tall,
    /// i.e. `(cols + 1) * (rows + 1)` intersections.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            transfer_spacing: DEFAULT_TRANSFER_SPACING,
            lines: Vec::new(),
            stops: Vec::new(),
            random_stops: None,
        }
    }

    /// Minimum Manhattan distance between two transfer stops.
    pub fn transfer_spacing(mut self, blocks: u32) -> Self {
        self.transfer_spacing = blocks;
        self
    }

    /// Add a line through `waypoints`.
    ///
    /// Between consecutive waypoints the path runs horizontally first, then
    /// vertically (see [`expand_waypoints`]).
    pub fn line(
        mut self,
        code: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        waypoints: &[NodeId],
    ) -> Self {
        self.lines.push(PendingLine {
            code: code.into(),
            name: name.into(),
            color: color.into(),
            waypoints: waypoints.to_vec(),
        });
        self
    }

    /// Name an additional boarding stop.
    ///
    /// Nodes that already became transfer stops keep their interchange name.
    pub fn stop(mut self, node: NodeId, name: impl Into<String>) -> Self {
        self.stops.push((node, name.into()));
        self
    }

    /// Pick `count` further stops among served nodes, deterministically
    /// from `seed`.
    pub fn random_stops(mut self, count: usize, seed: u64) -> Self {
        self.random_stops = Some((count, seed));
        self
    }

    /// Validate everything and build the network.
    pub fn build(self) -> Result<Network, NetworkError> {
        if self.cols > MAX_GRID_BLOCKS || self.rows > MAX_GRID_BLOCKS {
            return Err(NetworkError::GridTooLarge {
                cols: self.cols,
                rows: self.rows,
                max: MAX_GRID_BLOCKS,
            });
        }

        let mut nodes = Vec::with_capacity((self.cols as usize + 1) * (self.rows as usize + 1));
        for row in 0..=self.rows {
            for col in 0..=self.cols {
                nodes.push(Node::new(NodeId::new(col, row)));
            }
        }
        let index: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        let mut lines = Vec::with_capacity(self.lines.len());
        let mut adjacency = Adjacency::new();

        for (i, pending) in self.lines.into_iter().enumerate() {
            let id = LineId(i);
            let path = expand_waypoints(&pending.waypoints);

            if let Some(outside) = path.iter().find(|n| !index.contains_key(*n)) {
                return Err(DomainError::OutsideGrid(*outside).into());
            }

            let line = Line::new(id, pending.code, pending.name, pending.color, path)?;

            for (u, v) in line.hops() {
                let option = EdgeOption { weight: 1, line: id };
                adjacency.entry(u).or_default().entry(v).or_default().push(option);
                adjacency.entry(v).or_default().entry(u).or_default().push(option);
            }

            for node in line.stops() {
                let served = &mut nodes[index[node]].lines;
                if !served.contains(&id) {
                    served.push(id);
                }
            }

            debug!(line = %line.code(), nodes = line.len(), "added line");
            lines.push(line);
        }

        let mut network = Network {
            cols: self.cols,
            rows: self.rows,
            nodes,
            index,
            lines,
            adjacency,
        };

        stops::assign_transfer_stops(&mut network, self.transfer_spacing);

        for (id, name) in self.stops {
            let node = network
                .node_mut(&id)
                .ok_or(DomainError::OutsideGrid(id))?;
            if !node.is_served() {
                return Err(NetworkError::UnservedStop(id));
            }
            if node.is_stop {
                debug!(node = %id, "already a stop, keeping existing name");
                continue;
            }
            node.is_stop = true;
            node.name = Some(name);
        }

        if let Some((count, seed)) = self.random_stops {
            stops::assign_random_stops(&mut network, count, seed);
        }

        Ok(network)
    }
}

/// Expand waypoints into a block-by-block path.
///
/// Each leg walks along the row to the target column, then along the column
/// to the target row. Shared corners appear once.
///
/// ```
/// use transit_server::domain::NodeId;
/// use transit_server::network::expand_waypoints;
///
/// let path = expand_waypoints(&[NodeId::new(0, 0), NodeId::new(2, 1)]);
/// assert_eq!(
///     path,
///     vec![NodeId::new(0, 0), NodeId::new(1, 0), NodeId::new(2, 0), NodeId::new(2, 1)]
/// );
/// ```
pub fn expand_waypoints(waypoints: &[NodeId]) -> Vec<NodeId> {
    let mut path: Vec<NodeId> = Vec::new();

    let Some(first) = waypoints.first() else {
        return path;
    };
    path.push(*first);

    let mut at = *first;
    for target in waypoints.iter().skip(1) {
        while at.col != target.col {
            at.col = step_towards(at.col, target.col);
            path.push(at);
        }
        while at.row != target.row {
            at.row = step_towards(at.row, target.row);
            path.push(at);
        }
    }

    path
}

fn step_towards(from: u16, to: u16) -> u16 {
    if from < to { from + 1 } else { from - 1 }
}
