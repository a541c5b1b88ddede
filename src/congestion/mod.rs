//! Congestion tracking and congestion-aware rerouting.
//!
//! - [`CongestionMatrix`] — Directed per-edge usage counts with balanced add/remove
//! - [`CongestedWeights`] — Base weights scaled quadratically by usage
//! - [`CongestionAwareRouter`] — Iterative random-batch rerouting loop

mod cost;
mod router;
mod tracker;

pub use cost::CongestedWeights;
pub use router::{CongestionAwareRouter, RouterConfig};
pub use tracker::CongestionMatrix;
