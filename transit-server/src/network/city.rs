//! The built-in city: a 30x30 block grid served by five fixed bus lines.

use super::{LineDefinition, NetworkDefinition, RandomStops};

const GRID_SIZE: u16 = 30;
const RANDOM_STOP_COUNT: usize = 40;
const RANDOM_STOP_SEED: u64 = 12345;

/// Definition of the default city.
///
/// Four straight lines frame the centre (rows 5 and 25, columns 5 and 25)
/// and a crosstown line zig-zags between them.
///
/// ```
/// use transit_server::network::default_city;
///
/// let network = default_city().build().unwrap();
/// assert_eq!(network.lines().len(), 5);
/// assert_eq!(network.nodes().len(), 31 * 31);
/// ```
pub fn default_city() -> NetworkDefinition {
    NetworkDefinition {
        cols: GRID_SIZE,
        rows: GRID_SIZE,
        transfer_spacing: super::stops::DEFAULT_TRANSFER_SPACING,
        lines: vec![
            line("L1", "North Line (Red)", "#ef4444", &["0_5", "30_5"]),
            line("L2", "South Line (Blue)", "#3b82f6", &["0_25", "30_25"]),
            line("L3", "West Line (Green)", "#22c55e", &["5_0", "5_30"]),
            line("L4", "East Line (Orange)", "#f97316", &["25_0", "25_30"]),
            line(
                "L5",
                "Crosstown Line (Purple)",
                "#a855f7",
                &["5_25", "10_25", "10_15", "20_15", "20_5", "25_5"],
            ),
        ],
        stops: Vec::new(),
        random_stops: Some(RandomStops {
            count: RANDOM_STOP_COUNT,
            seed: RANDOM_STOP_SEED,
        }),
    }
}

fn line(code: &str, name: &str, color: &str, waypoints: &[&str]) -> LineDefinition {
    LineDefinition {
        code: code.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        waypoints: waypoints.iter().map(|w| w.to_string()).collect(),
    }
}
