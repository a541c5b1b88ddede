//! Path search over edge-weight views.
//!
//! - [`find_shortest_path`] — Dijkstra with a fixed tie-break, O(n² log n)
//! - [`greedy_path`] — Nearest-unvisited-neighbor walk, O(n²) baseline
//! - [`shortest_paths_all`] / [`greedy_paths_all`] — Batch variants, one path
//!   per route, computed in parallel

mod dijkstra;
mod greedy;

use rayon::prelude::*;

use crate::error::Result;
use crate::graph::EdgeWeights;
use crate::models::{Path, VehicleRoute};

pub use dijkstra::find_shortest_path;
pub use greedy::greedy_path;

/// Shortest path for every route, in input order.
///
/// Computed in parallel on the rayon thread pool.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::models::VehicleRoute;
/// use u_traffic::pathfinding::shortest_paths_all;
///
/// let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
/// let paths = shortest_paths_all(&wm, &[VehicleRoute::new(0, 2), VehicleRoute::new(2, 0)]).unwrap();
/// assert_eq!(paths[0].nodes(), &[0, 1, 2]);
/// assert!(paths[1].is_empty());
/// ```
pub fn shortest_paths_all<W>(weights: &W, routes: &[VehicleRoute]) -> Result<Vec<Path>>
where
    W: EdgeWeights + Sync + ?Sized,
{
    routes
        .par_iter()
        .map(|r| find_shortest_path(weights, r.start, r.end))
        .collect()
}

/// Greedy path for every route, in input order.
pub fn greedy_paths_all<W>(weights: &W, routes: &[VehicleRoute]) -> Result<Vec<Path>>
where
    W: EdgeWeights + Sync + ?Sized,
{
    routes
        .par_iter()
        .map(|r| greedy_path(weights, r.start, r.end))
        .collect()
}
