//! Single-pair Dijkstra search over any [`EdgeWeights`] view.
//!
//! # Algorithm
//!
//! Classic Dijkstra with a binary min-heap keyed by `(distance, node)`.
//! The search stops as soon as the target is settled.
//!
//! # Tie-breaking
//!
//! Heap entries with equal distance pop in increasing node order, successors
//! are scanned in increasing index order, and a tentative distance is only
//! replaced by a strictly smaller one. Among equal-cost paths the one whose
//! predecessor was settled first wins, so on a 4-cycle `0-1-2-3-0` the route
//! `0 → 2` resolves to `[0, 1, 2]`, never `[0, 3, 2]`.
//!
//! # Complexity
//!
//! O(n² log n) on a dense matrix view.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::Result;
use crate::graph::EdgeWeights;
use crate::models::{Path, VehicleRoute};

/// Heap key with a total order on distances.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Distance(f64);

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Finds the least-cost path from `start` to `end`.
///
/// Returns `[start]` when `start == end` and [`Path::empty`] when `end` is
/// unreachable.
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
/// use u_traffic::pathfinding::find_shortest_path;
///
/// // 4-cycle: both 0→1→2 and 0→3→2 cost 2.
/// let wm = WeightMatrix::from_edges(4, &[
///     (0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (2, 1, 1.0),
///     (2, 3, 1.0), (3, 2, 1.0), (3, 0, 1.0), (0, 3, 1.0),
/// ]);
/// let path = find_shortest_path(&wm, 0, 2).unwrap();
/// assert_eq!(path.nodes(), &[0, 1, 2]);
/// ```
pub fn find_shortest_path<W: EdgeWeights + ?Sized>(
    weights: &W,
    start: usize,
    end: usize,
) -> Result<Path> {
    let n = weights.size();
    VehicleRoute::new(start, end).validate(n)?;
    if start == end {
        return Ok(Path::single(start));
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap: BinaryHeap<Reverse<(Distance, usize)>> = BinaryHeap::new();

    dist[start] = 0.0;
    heap.push(Reverse((Distance(0.0), start)));

    while let Some(Reverse((Distance(d), u))) = heap.pop() {
        if settled[u] {
            continue;
        }
        settled[u] = true;
        if u == end {
            break;
        }

        for v in 0..n {
            if settled[v] || !weights.is_traversable(u, v) {
                continue;
            }
            let candidate = d + weights.weight(u, v);
            if candidate < dist[v] {
                dist[v] = candidate;
                prev[v] = Some(u);
                heap.push(Reverse((Distance(candidate), v)));
            }
        }
    }

    if !settled[end] {
        return Ok(Path::empty());
    }

    let mut nodes = vec![end];
    let mut cur = end;
    while let Some(p) = prev[cur] {
        nodes.push(p);
        cur = p;
    }
    nodes.reverse();
    Ok(Path::from(nodes))
}
