//! Network construction errors.

use std::path::PathBuf;

use crate::domain::{DomainError, InvalidNodeId, NodeId};

/// Errors raised while building or loading a network.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// A line or stop failed validation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A node id in a definition could not be parsed
    #[error("{value:?}: {source}")]
    InvalidNodeId {
        value: String,
        #[source]
        source: InvalidNodeId,
    },

    /// The grid is larger than a network may be
    #[error("grid {cols}x{rows} exceeds the {max}x{max} limit")]
    GridTooLarge { cols: u16, rows: u16, max: u16 },

    /// A named stop is not served by any line
    #[error("stop {0} is not served by any line")]
    UnservedStop(NodeId),

    /// Reading a definition file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A definition file is not valid JSON
    #[error("invalid network definition: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NetworkError::from(DomainError::OutsideGrid(NodeId::new(40, 2)));
        assert_eq!(err.to_string(), "node 40_2 is outside the grid");

        let err = NetworkError::UnservedStop(NodeId::new(1, 1));
        assert_eq!(err.to_string(), "stop 1_1 is not served by any line");

        let err = NetworkError::GridTooLarge {
            cols: 2000,
            rows: 10,
            max: 1000,
        };
        assert_eq!(err.to_string(), "grid 2000x10 exceeds the 1000x1000 limit");

        let source = NodeId::parse("x").unwrap_err();
        let err = NetworkError::InvalidNodeId {
            value: "x".into(),
            source,
        };
        assert_eq!(err.to_string(), "\"x\": invalid node id: expected `col_row`");
    }
}
