//! Intersection identity and node attributes.

use std::fmt;

use super::LineId;

/// Error returned when parsing an invalid node id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node id: {reason}")]
pub struct InvalidNodeId {
    reason: &'static str,
}

/// An intersection on the street grid, identified by its coordinates.
///
/// The textual form is `col_row`, e.g. `12_5`.
///
/// # Examples
///
/// ```
/// use transit_server::domain::NodeId;
///
/// let id = NodeId::parse("12_5").unwrap();
/// assert_eq!(id.col, 12);
/// assert_eq!(id.row, 5);
/// assert_eq!(id.to_string(), "12_5");
///
/// assert!(NodeId::parse("12-5").is_err());
/// assert!(NodeId::parse("_5").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub col: u16,
    pub row: u16,
}

impl NodeId {
    /// Creates a node id from grid coordinates.
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Parse a node id from its `col_row` form.
    pub fn parse(s: &str) -> Result<Self, InvalidNodeId> {
        let (col, row) = s.split_once('_').ok_or(InvalidNodeId {
            reason: "expected `col_row`",
        })?;

        Ok(Self {
            col: parse_coordinate(col)?,
            row: parse_coordinate(row)?,
        })
    }

    /// Manhattan distance in blocks.
    pub fn manhattan_distance(&self, other: &NodeId) -> u32 {
        u32::from(self.col.abs_diff(other.col)) + u32::from(self.row.abs_diff(other.row))
    }

    /// Returns true if `other` is one block away horizontally or vertically.
    pub fn is_adjacent(&self, other: &NodeId) -> bool {
        self.manhattan_distance(other) == 1
    }
}

fn parse_coordinate(s: &str) -> Result<u16, InvalidNodeId> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidNodeId {
            reason: "coordinates must be decimal digits",
        });
    }
    s.parse().map_err(|_| InvalidNodeId {
        reason: "coordinate out of range",
    })
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}_{})", self.col, self.row)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.col, self.row)
    }
}

impl std::str::FromStr for NodeId {
    type Err = InvalidNodeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An intersection and what serves it.
///
/// Stop flags and names are assigned while the network is built and are
/// read-only afterwards. Whether the node is in service lives in
/// [`ServiceStatus`](crate::status::ServiceStatus), not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,

    /// Lines serving this node, in the order they were added.
    pub lines: Vec<LineId>,

    /// Boarding/alighting point.
    pub is_stop: bool,

    /// Stop served by more than one line.
    pub is_transfer: bool,

    /// Display name, set for stops.
    pub name: Option<String>,
}

impl Node {
    /// Creates a plain intersection served by no line.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            is_stop: false,
            is_transfer: false,
            name: None,
        }
    }

    /// Returns true if at least one line serves this node.
    pub fn is_served(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Rider-facing label: the stop name, or the crossing coordinates.
    pub fn label(&self) -> String {
        match (&self.name, self.is_stop) {
            (Some(name), true) => name.clone(),
            _ => format!("Crossing ({}, {})", self.id.col, self.id.row),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display output always parses back to the same id
        #[test]
        fn display_parses_back(col in any::<u16>(), row in any::<u16>()) {
            let id = NodeId::new(col, row);
            prop_assert_eq!(NodeId::parse(&id.to_string()).unwrap(), id);
        }

        /// Strings without the separator are always rejected
        #[test]
        fn missing_separator_rejected(s in "[0-9]{1,6}") {
            prop_assert!(NodeId::parse(&s).is_err());
        }
    }
}
