//! Transit line types.
//!
//! A `Line` is a fixed, ordered path of intersections. Lines never change
//! once the network is built.

use std::collections::HashMap;
use std::fmt;

use super::{DomainError, NodeId};

/// Dense index of a line within its network.
///
/// This is the tag carried by every edge option and by search states.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub usize);

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0 + 1)
    }
}

/// A transit line: an ordered simple path through the grid.
///
/// # Invariants
///
/// - At least two nodes
/// - No node appears twice
/// - Consecutive nodes are one block apart
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    code: String,
    name: String,
    color: String,
    stops: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
}

impl Line {
    /// Construct a line, validating its path.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{Line, LineId, NodeId};
    ///
    /// let path = vec![NodeId::new(0, 5), NodeId::new(1, 5), NodeId::new(1, 6)];
    /// let line = Line::new(LineId(0), "L1", "North Line", "#ef4444", path).unwrap();
    ///
    /// assert_eq!(line.position(&NodeId::new(1, 5)), Some(1));
    /// assert_eq!(line.len(), 3);
    /// ```
    pub fn new(
        id: LineId,
        code: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        stops: Vec<NodeId>,
    ) -> Result<Self, DomainError> {
        let code = code.into();

        if stops.len() < 2 {
            return Err(DomainError::LineTooShort(code));
        }

        let mut positions = HashMap::with_capacity(stops.len());
        for (idx, node) in stops.iter().enumerate() {
            if positions.insert(*node, idx).is_some() {
                return Err(DomainError::RepeatedNode { line: code, node: *node });
            }
        }

        for pair in stops.windows(2) {
            if !pair[0].is_adjacent(&pair[1]) {
                return Err(DomainError::NotAdjacent {
                    line: code,
                    from: pair[0],
                    to: pair[1],
                });
            }
        }

        Ok(Self {
            id,
            code,
            name: name.into(),
            color: color.into(),
            stops,
            positions,
        })
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    /// Short code, e.g. `L1`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display color used when drawing the line.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// The line's nodes in path order.
    pub fn stops(&self) -> &[NodeId] {
        &self.stops
    }

    /// Returns the node at a path position.
    pub fn stop_at(&self, idx: usize) -> Option<NodeId> {
        self.stops.get(idx).copied()
    }

    /// Returns the position of `node` on this line's path.
    pub fn position(&self, node: &NodeId) -> Option<usize> {
        self.positions.get(node).copied()
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.positions.contains_key(node)
    }

    /// Number of nodes on the path.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false: a line has at least two nodes.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Iterates over consecutive node pairs along the path.
    pub fn hops(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.stops.windows(2).map(|pair| (pair[0], pair[1]))
    }
}
