//! Graph model: edge weights and reachability.
//!
//! Provides the dense weight matrix shared by every other component, the
//! [`EdgeWeights`] view trait used by path search, and the boolean
//! reachability closure used to prune QUBO variables.

mod matrix;
mod reachability;

pub use matrix::{EdgeWeights, WeightMatrix, NO_EDGE};
pub use reachability::ReachabilityMatrix;
