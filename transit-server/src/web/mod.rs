//! Web layer for the transit route planner.
//!
//! Provides HTTP endpoints for inspecting the network, switching stops in
//! and out of service, and planning routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
