//! QUBO formulation of route sub-problems and the exact QUBO→Ising transform.
//!
//! - [`QuboFormulator`] — Penalty-based encoding of a vehicle subset with reachability pruning
//! - [`QuboModel`] — Sparse upper-triangular coefficient map
//! - [`qubo_to_ising`] — Energy-preserving conversion to spins
//! - [`IsingExport`] — Serializable bundle for external solvers

mod export;
mod formulator;
mod ising;
mod model;
mod variables;

pub use export::{IsingExport, VariableEntry};
pub use formulator::{PenaltyWeights, QuboFormulator, Subproblem, SubproblemConfig};
pub use ising::{qubo_to_ising, IsingModel};
pub use model::QuboModel;
pub use variables::{VariableIndex, VariableKey};
