//! # u-traffic
//!
//! Congestion-aware routing of many vehicles over a shared weighted graph,
//! plus QUBO/Ising formulation of small route-selection sub-problems for
//! offloading to a combinatorial solver.
//!
//! ## Modules
//!
//! - [`graph`] — Weight matrix, edge-weight trait, reachability closure
//! - [`pathfinding`] — Dijkstra shortest paths and a greedy baseline walk
//! - [`congestion`] — Per-edge usage tracking and the iterative rerouting loop
//! - [`evaluation`] — Path costs, route validation, edge usage statistics
//! - [`qubo`] — Sparse QUBO formulation and the exact QUBO→Ising transform
//! - [`models`] — Routes, paths, and routing outcomes
//! - [`error`] — Crate error type

pub mod congestion;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod models;
pub mod pathfinding;
pub mod qubo;

pub use error::{Result, TrafficError};
