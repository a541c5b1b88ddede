//! Greedy nearest-neighbor walk.
//!
//! Starting at the origin, always step to the cheapest unvisited neighbor
//! until the destination is reached or no unvisited neighbor remains.
//!
//! # Complexity
//!
//! O(n²) where n = number of nodes.
//!
//! # Reference
//!
//! The path analogue of the nearest-neighbor tour heuristic. It gives no
//! optimality guarantee and can dead-end on graphs where Dijkstra succeeds;
//! it is kept as a cheap baseline for comparing against the congestion
//! router.

use crate::error::Result;
use crate::graph::EdgeWeights;
use crate::models::{Path, VehicleRoute};

/// Walks greedily from `start` toward `end`.
///
/// Ties between equally cheap neighbors go to the lower node index. Returns
/// [`Path::empty`] if the walk gets stuck before reaching `end`.
///
/// # Errors
///
/// [`TrafficError::NodeOutOfRange`](crate::TrafficError::NodeOutOfRange) if
/// either endpoint is outside the graph.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::pathfinding::greedy_path;
///
/// // Greedy takes the cheap first hop and pays for it later.
/// let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.0), (1, 2, 10.0), (0, 2, 5.0)]);
/// assert_eq!(greedy_path(&wm, 0, 2).unwrap().nodes(), &[0, 1, 2]);
/// ```
pub fn greedy_path<W: EdgeWeights + ?Sized>(weights: &W, start: usize, end: usize) -> Result<Path> {
    let n = weights.size();
    VehicleRoute::new(start, end).validate(n)?;

    let mut visited = vec![false; n];
    visited[start] = true;
    let mut nodes = vec![start];
    let mut current = start;

    while current != end {
        let mut best: Option<(usize, f64)> = None;
        for next in 0..n {
            if visited[next] || !weights.is_traversable(current, next) {
                continue;
            }
            let w = weights.weight(current, next);
            let better = match best {
                Some((_, bw)) => w < bw,
                None => true,
            };
            if better {
                best = Some((next, w));
            }
        }

        match best {
            Some((next, _)) => {
                visited[next] = true;
                nodes.push(next);
                current = next;
            }
            None => return Ok(Path::empty()),
        }
    }

    Ok(Path::from(nodes))
}
