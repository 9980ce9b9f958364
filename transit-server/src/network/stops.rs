//! Stop assignment: interchanges where lines cross, plus named stops
//! scattered along the lines.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::Network;
use crate::domain::NodeId;

/// Transfer stops closer than this (in blocks) to an existing one are skipped.
pub const DEFAULT_TRANSFER_SPACING: u32 = 6;

const STOP_PREFIXES: [&str; 8] = [
    "North Ave", "Plaza", "Street", "Park", "Station", "Market", "Center", "Hospital",
];

const STOP_SUFFIXES: [&str; 8] = [
    "Blue", "Central", "Main", "Sun", "Moon", "Royal", "South", "West",
];

/// Name of the city zone containing `node`.
///
/// The grid is cut into thirds on each axis; corners are named first.
pub fn zone_name(node: NodeId, cols: u16, rows: u16) -> &'static str {
    let west = node.col < cols / 3;
    let east = node.col > cols - cols / 3;
    let north = node.row < rows / 3;
    let south = node.row > rows - rows / 3;

    match (north, south, west, east) {
        (true, _, true, _) => "Northwest",
        (true, _, _, true) => "Northeast",
        (_, true, true, _) => "Southwest",
        (_, true, _, true) => "Southeast",
        (true, _, _, _) => "North",
        (_, true, _, _) => "South",
        (_, _, true, _) => "West",
        (_, _, _, true) => "East",
        _ => "Central",
    }
}

/// Turn line crossings into interchange stops, scanning in row-major order
/// and skipping crossings too close to an interchange already placed.
pub(super) fn assign_transfer_stops(network: &mut Network, spacing: u32) {
    let (cols, rows) = (network.cols, network.rows);
    let mut placed: Vec<NodeId> = Vec::new();
    let mut per_zone: HashMap<&'static str, usize> = HashMap::new();

    for node in network.nodes.iter_mut() {
        if node.lines.len() < 2 || node.is_stop {
            continue;
        }

        if placed.iter().any(|p| p.manhattan_distance(&node.id) < spacing) {
            debug!(node = %node.id, "crossing too close to another interchange");
            continue;
        }

        let zone = zone_name(node.id, cols, rows);
        let seen = per_zone.entry(zone).or_insert(0);
        *seen += 1;
        let name = if *seen == 1 {
            format!("Interchange {zone}")
        } else {
            format!("Interchange {zone} {seen}")
        };

        node.is_stop = true;
        node.is_transfer = true;
        node.name = Some(name);
        placed.push(node.id);
    }
}

/// Promote up to `count` served, non-stop nodes to named stops.
pub(super) fn assign_random_stops(network: &mut Network, count: usize, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut eligible: Vec<usize> = network
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.is_served() && !n.is_stop)
        .map(|(i, _)| i)
        .collect();
    eligible.shuffle(&mut rng);

    for (i, idx) in eligible.into_iter().take(count).enumerate() {
        let prefix = STOP_PREFIXES[rng.gen_range(0..STOP_PREFIXES.len())];
        let suffix = STOP_SUFFIXES[rng.gen_range(0..STOP_SUFFIXES.len())];

        let node = &mut network.nodes[idx];
        node.is_stop = true;
        node.name = Some(format!("{prefix} {suffix} ({})", i + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    fn n(col: u16, row: u16) -> NodeId {
        NodeId::new(col, row)
    }

    #[test]
    fn zones_on_thirty_grid() {
        assert_eq!(zone_name(n(0, 0), 30, 30), "Northwest");
        assert_eq!(zone_name(n(25, 5), 30, 30), "Northeast");
        assert_eq!(zone_name(n(5, 25), 30, 30), "Southwest");
        assert_eq!(zone_name(n(25, 25), 30, 30), "Southeast");
        assert_eq!(zone_name(n(15, 5), 30, 30), "North");
        assert_eq!(zone_name(n(10, 25), 30, 30), "South");
        assert_eq!(zone_name(n(5, 15), 30, 30), "West");
        assert_eq!(zone_name(n(25, 15), 30, 30), "East");
        assert_eq!(zone_name(n(15, 15), 30, 30), "Central");
        // Boundaries belong to the middle band
        assert_eq!(zone_name(n(10, 20), 30, 30), "Central");
    }

    #[test]
    fn crossing_becomes_interchange() {
        let net = NetworkBuilder::new(30, 30)
            .line("L1", "x", "#000", &[n(0, 15), n(30, 15)])
            .line("L2", "y", "#fff", &[n(15, 0), n(15, 30)])
            .build()
            .unwrap();

        let node = net.node(&n(15, 15)).unwrap();
        assert!(node.is_stop);
        assert!(node.is_transfer);
        assert_eq!(node.label(), "Interchange Central");
    }

    #[test]
    fn close_crossings_are_thinned() {
        // Two vertical lines crossing a horizontal one 3 blocks apart
        let net = NetworkBuilder::new(30, 30)
            .line("L1", "x", "#000", &[n(0, 15), n(30, 15)])
            .line("L2", "y", "#fff", &[n(12, 0), n(12, 30)])
            .line("L3", "z", "#aaa", &[n(15, 0), n(15, 30)])
            .build()
            .unwrap();

        assert!(net.node(&n(12, 15)).unwrap().is_transfer);
        let skipped = net.node(&n(15, 15)).unwrap();
        assert!(!skipped.is_stop);
        assert!(!skipped.is_transfer);
        assert_eq!(skipped.lines.len(), 2);
    }

    #[test]
    fn repeated_zone_names_are_numbered() {
        let net = NetworkBuilder::new(30, 30)
            .line("L1", "x", "#000", &[n(0, 15), n(30, 15)])
            .line("L2", "y", "#fff", &[n(12, 0), n(12, 30)])
            .line("L3", "z", "#aaa", &[n(18, 0), n(18, 30)])
            .build()
            .unwrap();

        assert_eq!(net.node(&n(12, 15)).unwrap().label(), "Interchange Central");
        assert_eq!(net.node(&n(18, 15)).unwrap().label(), "Interchange Central 2");
    }

    #[test]
    fn random_stops_are_deterministic() {
        let build = || {
            NetworkBuilder::new(10, 10)
                .line("L1", "x", "#000", &[n(0, 5), n(10, 5)])
                .random_stops(4, 7)
                .build()
                .unwrap()
        };
        let a: Vec<(NodeId, String)> = build().stops().map(|s| (s.id, s.label())).collect();
        let b: Vec<(NodeId, String)> = build().stops().map(|s| (s.id, s.label())).collect();

        assert_eq!(a.len(), 4);
        assert_eq!(a, b);
        assert!(a.iter().all(|(id, _)| id.row == 5));
    }

    #[test]
    fn random_stops_capped_by_eligible_nodes() {
        let net = NetworkBuilder::new(3, 3)
            .line("L1", "x", "#000", &[n(0, 0), n(2, 0)])
            .random_stops(40, 1)
            .build()
            .unwrap();

        assert_eq!(net.stops().count(), 3);
        assert!(net.stops().all(|s| s.label().ends_with(')')));
    }
}
