//! Rider-facing itineraries.
//!
//! An `Itinerary` groups a route's one-block segments into rides, one per
//! uninterrupted stretch on a single line, and estimates the travel time.

use chrono::Duration;

use super::config::RoutingConfig;
use super::search::{Route, RouteSegment};
use crate::domain::{LineId, NodeId};

/// Error building an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    /// No segments to group
    #[error("itinerary needs at least one segment")]
    EmptyRoute,

    /// A segment does not start where the previous one ended
    #[error("segment ending at {0} is followed by one starting at {1}")]
    Disconnected(NodeId, NodeId),

    /// The transfer count disagrees with the line changes in the segments
    #[error("expected {expected} transfers, segments change line {actual} times")]
    TransferMismatch { expected: usize, actual: usize },

    /// The time estimate does not fit in a duration
    #[error("travel time estimate is out of range")]
    TimeOutOfRange,
}

/// One uninterrupted ride on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideGroup {
    pub line: LineId,
    pub board: NodeId,
    pub alight: NodeId,
    /// Blocks ridden.
    pub hops: usize,
    /// Riding time for this group.
    pub duration: Duration,
}

/// Grouped rides plus a deterministic time estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    rides: Vec<RideGroup>,
    transfer_count: usize,
    total_hops: usize,
    total_time: Duration,
    estimate_low: Duration,
    estimate_high: Duration,
}

/// Group `segments` into rides and estimate the travel time.
///
/// Total time is `hops * per_hop + transfers * per_transfer`.
///
/// # Errors
///
/// Returns `Err` if:
/// - `segments` is empty
/// - consecutive segments don't connect
/// - `transfer_count` is not the number of line changes
///
/// # Examples
///
/// ```
/// use transit_server::domain::{LineId, NodeId};
/// use transit_server::planner::{RouteSegment, RoutingConfig, build_itinerary};
///
/// let seg = |from: (u16, u16), to: (u16, u16), line| RouteSegment {
///     from: NodeId::new(from.0, from.1),
///     to: NodeId::new(to.0, to.1),
///     line: LineId(line),
/// };
/// let segments = [seg((0, 0), (1, 0), 0), seg((1, 0), (1, 1), 1)];
///
/// let itinerary = build_itinerary(&segments, 1, &RoutingConfig::default()).unwrap();
/// assert_eq!(itinerary.rides().len(), 2);
/// assert_eq!(itinerary.total_time().num_minutes(), 2 + 5);
/// ```
pub fn build_itinerary(
    segments: &[RouteSegment],
    transfer_count: usize,
    config: &RoutingConfig,
) -> Result<Itinerary, ItineraryError> {
    let Some(first) = segments.first() else {
        return Err(ItineraryError::EmptyRoute);
    };

    for pair in segments.windows(2) {
        if pair[0].to != pair[1].from {
            return Err(ItineraryError::Disconnected(pair[0].to, pair[1].from));
        }
    }

    let mut rides = Vec::new();
    let mut current = RideGroup {
        line: first.line,
        board: first.from,
        alight: first.to,
        hops: 1,
        duration: Duration::zero(),
    };

    for segment in &segments[1..] {
        if segment.line == current.line {
            current.alight = segment.to;
            current.hops += 1;
        } else {
            rides.push(current);
            current = RideGroup {
                line: segment.line,
                board: segment.from,
                alight: segment.to,
                hops: 1,
                duration: Duration::zero(),
            };
        }
    }
    rides.push(current);

    let actual = rides.len() - 1;
    if actual != transfer_count {
        return Err(ItineraryError::TransferMismatch {
            expected: transfer_count,
            actual,
        });
    }

    let per_hop = config.per_hop().ok_or(ItineraryError::TimeOutOfRange)?;
    let per_transfer = config.per_transfer().ok_or(ItineraryError::TimeOutOfRange)?;

    for ride in &mut rides {
        ride.duration = scale(per_hop, ride.hops)?;
    }

    let total_hops = segments.len();
    let total_time = scale(per_hop, total_hops)?
        .checked_add(&scale(per_transfer, transfer_count)?)
        .ok_or(ItineraryError::TimeOutOfRange)?;
    let total_mins = total_time.num_minutes();
    let spread = config.estimate_spread_percent;

    Ok(Itinerary {
        rides,
        transfer_count,
        total_hops,
        total_time,
        estimate_low: ceil_percent(total_mins, 100_i64.saturating_sub(spread))?,
        estimate_high: ceil_percent(total_mins, 100_i64.saturating_add(spread))?,
    })
}

/// `unit * count`, failing instead of overflowing.
fn scale(unit: Duration, count: usize) -> Result<Duration, ItineraryError> {
    i32::try_from(count)
        .ok()
        .and_then(|count| unit.checked_mul(count))
        .ok_or(ItineraryError::TimeOutOfRange)
}

/// `ceil(value * percent / 100)` minutes for non-negative inputs.
fn ceil_percent(value: i64, percent: i64) -> Result<Duration, ItineraryError> {
    value
        .checked_mul(percent.max(0))
        .and_then(|scaled| scaled.checked_add(99))
        .and_then(|scaled| Duration::try_minutes(scaled / 100))
        .ok_or(ItineraryError::TimeOutOfRange)
}

impl Itinerary {
    /// Build the itinerary for a found route.
    pub fn from_route(route: &Route, config: &RoutingConfig) -> Result<Self, ItineraryError> {
        build_itinerary(route.segments(), route.transfer_count(), config)
    }

    /// Rides in travel order.
    pub fn rides(&self) -> &[RideGroup] {
        &self.rides
    }

    pub fn transfer_count(&self) -> usize {
        self.transfer_count
    }

    /// Blocks ridden across all rides.
    pub fn total_hops(&self) -> usize {
        self.total_hops
    }

    /// Estimated door-to-door time.
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    /// Rider-facing range around [`total_time`](Self::total_time).
    pub fn estimate_range(&self) -> (Duration, Duration) {
        (self.estimate_low, self.estimate_high)
    }

    pub fn origin(&self) -> NodeId {
        // Safe: at least one ride by construction
        self.rides[0].board
    }

    pub fn destination(&self) -> NodeId {
        self.rides[self.rides.len() - 1].alight
    }
}
