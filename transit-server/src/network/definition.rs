//! Serializable network definitions.
//!
//! A definition is the on-disk description of a city: grid size, line
//! waypoints and named stops. Building it yields a [`Network`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::stops::DEFAULT_TRANSFER_SPACING;
use super::{Network, NetworkBuilder, NetworkError};
use crate::domain::NodeId;

/// Description of a whole network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    /// Blocks across.
    pub cols: u16,

    /// Blocks down.
    pub rows: u16,

    #[serde(default = "default_transfer_spacing")]
    pub transfer_spacing: u32,

    pub lines: Vec<LineDefinition>,

    #[serde(default)]
    pub stops: Vec<StopDefinition>,

    #[serde(default)]
    pub random_stops: Option<RandomStops>,
}

fn default_transfer_spacing() -> u32 {
    DEFAULT_TRANSFER_SPACING
}

/// A line given by its corner waypoints (`"col_row"` strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDefinition {
    pub code: String,
    pub name: String,
    pub color: String,
    pub waypoints: Vec<String>,
}

/// An explicitly named stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopDefinition {
    pub node: String,
    pub name: String,
}

/// Request for seeded, randomly placed stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomStops {
    pub count: usize,
    pub seed: u64,
}

impl NetworkDefinition {
    /// Parse a definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a definition from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build the network this definition describes.
    pub fn build(&self) -> Result<Network, NetworkError> {
        let mut builder =
            NetworkBuilder::new(self.cols, self.rows).transfer_spacing(self.transfer_spacing);

        for line in &self.lines {
            let waypoints = line
                .waypoints
                .iter()
                .map(|w| parse_node(w))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.line(&line.code, &line.name, &line.color, &waypoints);
        }

        for stop in &self.stops {
            builder = builder.stop(parse_node(&stop.node)?, &stop.name);
        }

        if let Some(random) = self.random_stops {
            builder = builder.random_stops(random.count, random.seed);
        }

        builder.build()
    }
}

fn parse_node(value: &str) -> Result<NodeId, NetworkError> {
    NodeId::parse(value).map_err(|source| NetworkError::InvalidNodeId {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SMALL: &str = r##"{
        "cols": 6,
        "rows": 6,
        "lines": [
            { "code": "L1", "name": "Row line", "color": "#ef4444", "waypoints": ["0_3", "6_3"] },
            { "code": "L2", "name": "Col line", "color": "#3b82f6", "waypoints": ["3_0", "3_6"] }
        ],
        "stops": [ { "node": "1_3", "name": "Plaza Sun" } ]
    }"##;

    #[test]
    fn parse_and_build() {
        let def = NetworkDefinition::from_json(SMALL).unwrap();
        assert_eq!(def.transfer_spacing, DEFAULT_TRANSFER_SPACING);
        assert!(def.random_stops.is_none());

        let net = def.build().unwrap();
        assert_eq!(net.lines().len(), 2);
        assert_eq!(net.lines()[0].len(), 7);
        assert!(net.node(&NodeId::new(3, 3)).unwrap().is_transfer);
        assert_eq!(net.node(&NodeId::new(1, 3)).unwrap().label(), "Plaza Sun");
    }

    #[test]
    fn reject_bad_waypoint() {
        let json = r##"{
            "cols": 2, "rows": 2,
            "lines": [ { "code": "L1", "name": "x", "color": "#000", "waypoints": ["0-0", "2_0"] } ]
        }"##;
        let err = NetworkDefinition::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, NetworkError::InvalidNodeId { value, .. } if value == "0-0"));
    }

    #[test]
    fn reject_oversized_grid() {
        let json = r##"{
            "cols": 65535, "rows": 65535,
            "lines": [ { "code": "L1", "name": "x", "color": "#000", "waypoints": ["0_0", "2_0"] } ]
        }"##;
        let err = NetworkDefinition::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, NetworkError::GridTooLarge { cols: 65535, rows: 65535, .. }));
    }

    #[test]
    fn reject_malformed_json() {
        let err = NetworkDefinition::from_json("{ \"cols\": 3 ").unwrap_err();
        assert!(matches!(err, NetworkError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL.as_bytes()).unwrap();

        let def = NetworkDefinition::from_path(file.path()).unwrap();
        assert_eq!(def.cols, 6);
        assert_eq!(def.stops.len(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = NetworkDefinition::from_path(&path).unwrap_err();
        assert!(matches!(err, NetworkError::Io { path: p, .. } if p == path));
    }

    #[test]
    fn serializes_back_to_equal_definition() {
        let def = NetworkDefinition::from_json(SMALL).unwrap();
        let json = serde_json::to_string(&def).unwrap();
        assert_eq!(NetworkDefinition::from_json(&json).unwrap(), def);
    }
}
