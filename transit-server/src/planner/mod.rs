//! Route planning over the transit network.
//!
//! This module implements the core planning algorithm that answers:
//! "What is the cheapest way from this stop to that one, given which stops
//! are closed right now?"
//!
//! The router runs a shortest-path search over (node, arrival line) states,
//! charging a penalty for each change of line and riding through closed
//! stops where the rider stays on the same line. The itinerary builder then
//! turns the resulting block-by-block route into rides and a time estimate.

mod config;
mod itinerary;
mod search;


pub use config::{ConfigError, RoutingConfig};
pub use itinerary::{Itinerary, ItineraryError, RideGroup, build_itinerary};
pub use search::{Route, RouteError, RouteSegment, Router};
