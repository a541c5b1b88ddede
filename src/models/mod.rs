//! Domain model types for congestion-aware routing.
//!
//! Provides route requests (one per vehicle), the node paths that serve
//! them, and the outcome of an iterative routing run.

mod route;
mod solution;

pub use route::{validate_routes, Path, VehicleRoute};
pub use solution::{CostSnapshot, RoutingOutcome};
