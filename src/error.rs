//! Error types for routing and sub-problem formulation.
//!
//! Only invalid input and infeasible sub-problems are errors. An unreachable
//! destination is an ordinary graph condition and is reported as an empty
//! [`Path`](crate::models::Path) instead.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TrafficError>;

/// Errors raised by graph construction, routing, and QUBO formulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrafficError {
    /// The flat weight buffer does not form an `n × n` matrix.
    #[error("weight matrix is not square: {len} entries for {rows} rows")]
    NonSquareMatrix {
        /// Declared row count.
        rows: usize,
        /// Number of entries supplied.
        len: usize,
    },

    /// An edge weight is negative or NaN.
    #[error("invalid weight {value} on edge ({from}, {to})")]
    InvalidWeight {
        /// Source node.
        from: usize,
        /// Target node.
        to: usize,
        /// Offending value.
        value: f64,
    },

    /// A node index is outside `[0, size)`.
    #[error("node {node} out of range for graph of size {size}")]
    NodeOutOfRange {
        /// Offending node index.
        node: usize,
        /// Number of nodes in the graph.
        size: usize,
    },

    /// The formulator was given no vehicles.
    #[error("vehicle subset cannot be empty")]
    EmptyVehicleSubset,

    /// A vehicle index does not name a route in the batch.
    #[error("vehicle {vehicle} out of range for {count} routes")]
    VehicleOutOfRange {
        /// Offending vehicle index.
        vehicle: usize,
        /// Number of routes in the batch.
        count: usize,
    },

    /// The variable budget is zero.
    #[error("max_qubits must be greater than zero")]
    ZeroQubitBudget,

    /// The reroute fraction is NaN or outside `[0, 1]`.
    #[error("reroute fraction must be within [0, 1], got {0}")]
    InvalidRerouteFraction(f64),

    /// No variable survived candidate filtering.
    #[error("no variables after filtering for vehicles {vehicles:?}; increase max_qubits or relax filtering")]
    InfeasibleSubproblem {
        /// The requested vehicle subset.
        vehicles: Vec<usize>,
    },
}
