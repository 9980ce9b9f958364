//! Least-cost route search over (node, arrival line) states.
//!
//! The search runs Dijkstra's algorithm on an expanded state space: the same
//! intersection reached on two different lines is two different states. That
//! lets a transfer penalty be charged exactly when the line changes, and lets
//! the router tell "still riding line X" from "about to board line X".
//!
//! Closed stops are handled while relaxing edges. A rider already on a line
//! rides through closed stops to the next open one (a detour); nobody can
//! change onto a line at a closed stop.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, trace};

use super::config::RoutingConfig;
use crate::domain::{LineId, NodeId};
use crate::network::{EdgeOption, Network};
use crate::status::StatusProvider;

/// Rejected route request.
///
/// "No route" is not an error: see [`Router::find_route`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Start and end are the same node
    #[error("start and end are both {0}")]
    SameEndpoints(NodeId),

    /// Node is not part of the network
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Start or end is closed
    #[error("stop {0} is out of service")]
    OutOfService(NodeId),
}

/// One block ridden on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub line: LineId,
}

/// A found route: one segment per block, in travel order.
///
/// # Invariants
///
/// - At least one segment
/// - Consecutive segments connect (`to` of one is `from` of the next)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    segments: Vec<RouteSegment>,
    cost: u32,
}

impl Route {
    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// Search cost: blocks ridden plus transfer penalties.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn origin(&self) -> NodeId {
        // Safe: routes always have at least one segment
        self.segments[0].from
    }

    pub fn destination(&self) -> NodeId {
        self.segments[self.segments.len() - 1].to
    }

    /// Number of blocks ridden.
    pub fn hop_count(&self) -> usize {
        self.segments.len()
    }

    /// Number of line changes.
    pub fn transfer_count(&self) -> usize {
        self.segments
            .windows(2)
            .filter(|pair| pair[0].line != pair[1].line)
            .count()
    }

    /// Every node visited, origin first.
    pub fn nodes(&self) -> Vec<NodeId> {
        std::iter::once(self.origin())
            .chain(self.segments.iter().map(|s| s.to))
            .collect()
    }
}

/// Search state: where the rider is and which line brought them there.
///
/// `arrival` is `None` only at the start, before any line is boarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SearchState {
    node: NodeId,
    arrival: Option<LineId>,
}

/// How a state was reached.
#[derive(Debug, Clone)]
struct Predecessor {
    from: SearchState,
    line: LineId,
    /// Nodes passed on a detour, ending at the node reached. Empty for a
    /// plain one-block hop.
    via: Vec<NodeId>,
}

/// The result of relaxing one edge option.
#[derive(Debug)]
struct Hop {
    to: NodeId,
    weight: u32,
    via: Vec<NodeId>,
}

#[derive(Debug, Default)]
struct SearchStats {
    settled: usize,
    stale: usize,
    detours: usize,
    abandoned: usize,
}

/// Route finder over a network and its live service status.
pub struct Router<'a, S: StatusProvider> {
    network: &'a Network,
    status: &'a S,
    config: &'a RoutingConfig,
}

impl<'a, S: StatusProvider> Router<'a, S> {
    /// Create a new router.
    pub fn new(network: &'a Network, status: &'a S, config: &'a RoutingConfig) -> Self {
        Self {
            network,
            status,
            config,
        }
    }

    /// Check a request before searching.
    pub fn validate(&self, start: NodeId, end: NodeId) -> Result<(), RouteError> {
        for node in [start, end] {
            if !self.network.contains(&node) {
                return Err(RouteError::UnknownNode(node));
            }
        }

        if start == end {
            return Err(RouteError::SameEndpoints(start));
        }

        for node in [start, end] {
            if self.status.is_out_of_service(node) {
                return Err(RouteError::OutOfService(node));
            }
        }

        Ok(())
    }

    /// Find the cheapest route from `start` to `end`.
    ///
    /// Returns `Ok(None)` when every route is blocked by closed stops, and
    /// `Err` only for requests rejected by [`validate`](Self::validate).
    pub fn find_route(&self, start: NodeId, end: NodeId) -> Result<Option<Route>, RouteError> {
        self.validate(start, end)?;

        let origin = SearchState {
            node: start,
            arrival: None,
        };

        let mut best: HashMap<SearchState, u32> = HashMap::new();
        let mut prev: HashMap<SearchState, Predecessor> = HashMap::new();
        // (cost, insertion order, state): equal costs pop first-in first-out
        let mut queue: BinaryHeap<Reverse<(u32, u64, SearchState)>> = BinaryHeap::new();
        let mut pushed: u64 = 0;
        let mut stats = SearchStats::default();

        best.insert(origin, 0);
        queue.push(Reverse((0, pushed, origin)));

        let mut reached = None;

        while let Some(Reverse((cost, _, state))) = queue.pop() {
            if best.get(&state).is_some_and(|&known| cost > known) {
                stats.stale += 1;
                continue;
            }
            stats.settled += 1;

            // Weights are positive, so the first settled arrival is optimal
            if state.node == end {
                reached = Some((state, cost));
                break;
            }

            for (neighbor, options) in self.network.neighbors(&state.node) {
                for option in options {
                    let Some(hop) = self.relax(&state, neighbor, option, &mut stats) else {
                        continue;
                    };

                    let penalty = if state.arrival.is_some_and(|line| line != option.line) {
                        self.config.transfer_penalty
                    } else {
                        0
                    };
                    let Some(next_cost) = cost
                        .checked_add(hop.weight)
                        .and_then(|c| c.checked_add(penalty))
                    else {
                        trace!(at = %hop.to, "cost overflow, dropping option");
                        stats.abandoned += 1;
                        continue;
                    };

                    let next = SearchState {
                        node: hop.to,
                        arrival: Some(option.line),
                    };

                    if best.get(&next).is_none_or(|&known| next_cost < known) {
                        best.insert(next, next_cost);
                        prev.insert(
                            next,
                            Predecessor {
                                from: state,
                                line: option.line,
                                via: hop.via,
                            },
                        );
                        pushed += 1;
                        queue.push(Reverse((next_cost, pushed, next)));
                    }
                }
            }
        }

        debug!(
            %start,
            %end,
            settled = stats.settled,
            stale = stats.stale,
            detours = stats.detours,
            abandoned = stats.abandoned,
            found = reached.is_some(),
            "route search finished"
        );

        Ok(reached.map(|(state, cost)| Route {
            segments: reconstruct(&prev, state),
            cost,
        }))
    }

    /// Work out where an edge option actually takes the rider.
    ///
    /// Returns `None` if the option cannot be used: boarding a line at a
    /// closed stop, or a closed stretch running to the end of the line.
    fn relax(
        &self,
        state: &SearchState,
        neighbor: NodeId,
        option: &EdgeOption,
        stats: &mut SearchStats,
    ) -> Option<Hop> {
        if !self.status.is_out_of_service(neighbor) {
            return Some(Hop {
                to: neighbor,
                weight: option.weight,
                via: Vec::new(),
            });
        }

        // At the start the rider boards at `state.node`, which is open
        let staying_on = state.arrival.is_none_or(|line| line == option.line);
        if !staying_on {
            trace!(at = %neighbor, line = %option.line, "cannot change line at a closed stop");
            stats.abandoned += 1;
            return None;
        }

        match self.detour(option.line, state.node, neighbor) {
            Some(hop) => {
                trace!(closed = %neighbor, resume = %hop.to, blocks = hop.weight, "detour");
                stats.detours += 1;
                Some(hop)
            }
            None => {
                trace!(closed = %neighbor, line = %option.line, "no open stop further along");
                stats.abandoned += 1;
                None
            }
        }
    }

    /// Ride `line` from `from` through the closed stop `closed`, in the
    /// direction of travel, to the first open stop.
    fn detour(&self, line: LineId, from: NodeId, closed: NodeId) -> Option<Hop> {
        let line = self.network.line(line)?;
        let from_idx = line.position(&from)?;
        let closed_idx = line.position(&closed)?;
        let forward = closed_idx > from_idx;

        let mut via = Vec::new();
        let mut idx = closed_idx;
        loop {
            let node = line.stop_at(idx)?;
            via.push(node);

            if !self.status.is_out_of_service(node) {
                let weight = u32::try_from(idx.abs_diff(from_idx)).ok()?;
                return Some(Hop {
                    to: node,
                    weight,
                    via,
                });
            }

            idx = if forward { idx + 1 } else { idx.checked_sub(1)? };
        }
    }
}

/// Walk predecessors back from `end` and emit one-block segments in travel
/// order, expanding detours.
fn reconstruct(prev: &HashMap<SearchState, Predecessor>, end: SearchState) -> Vec<RouteSegment> {
    let mut segments = Vec::new();
    let mut current = end;

    while let Some(step) = prev.get(&current) {
        let mut stops = Vec::with_capacity(step.via.len() + 2);
        stops.push(step.from.node);
        if step.via.is_empty() {
            stops.push(current.node);
        } else {
            stops.extend_from_slice(&step.via);
        }

        for pair in stops.windows(2).rev() {
            segments.push(RouteSegment {
                from: pair[0],
                to: pair[1],
                line: step.line,
            });
        }

        current = step.from;
    }

    segments.reverse();
    segments
}
