//! Congestion-weighted edge costs.
//!
//! An edge used by `c` paths costs `base · max(c, 1)²`: unused and singly
//! used edges keep their base weight, and each additional vehicle makes the
//! edge super-linearly more expensive.

use super::CongestionMatrix;
use crate::graph::{EdgeWeights, WeightMatrix};
use crate::models::Path;

/// A live view of `base` weights scaled by current congestion.
///
/// Reads the congestion matrix on every lookup, so it always reflects the
/// latest add/remove without materializing a new n×n matrix.
///
/// # Examples
///
/// ```
/// use u_traffic::congestion::{CongestedWeights, CongestionMatrix};
/// use u_traffic::graph::{EdgeWeights, WeightMatrix};
/// use u_traffic::models::Path;
///
/// let wm = WeightMatrix::from_edges(2, &[(0, 1, 2.0)]);
/// let shared = vec![Path::from(vec![0, 1]); 3];
/// let cm = CongestionMatrix::build(2, &shared);
/// let view = CongestedWeights::new(&wm, &cm);
/// assert_eq!(view.weight(0, 1), 18.0); // 2 · 3²
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CongestedWeights<'a> {
    base: &'a WeightMatrix,
    congestion: &'a CongestionMatrix,
}

impl<'a> CongestedWeights<'a> {
    /// Creates a view over `base` scaled by `congestion`.
    ///
    /// # Panics
    ///
    /// Panics if the two matrices disagree on the node count.
    pub fn new(base: &'a WeightMatrix, congestion: &'a CongestionMatrix) -> Self {
        assert_eq!(
            base.size(),
            congestion.size(),
            "congestion matrix size must match the graph"
        );
        Self { base, congestion }
    }

    /// Total congestion-weighted cost of a set of paths.
    ///
    /// Empty (unreachable) paths contribute nothing.
    pub fn total_cost(&self, paths: &[Path]) -> f64 {
        paths
            .iter()
            .flat_map(|p| p.edges())
            .map(|(from, to)| self.weight(from, to))
            .sum()
    }
}

impl EdgeWeights for CongestedWeights<'_> {
    fn size(&self) -> usize {
        self.base.size()
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        let base = self.base.get(from, to);
        let usage = f64::from(self.congestion.get(from, to).max(1));
        base * usage * usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NO_EDGE;

    #[test]
    fn test_unused_and_single_use_keep_base_weight() {
        let wm = WeightMatrix::from_edges(3, &[(0, 1, 2.0), (1, 2, 3.0)]);
        let cm = CongestionMatrix::build(3, &[Path::from(vec![0, 1])]);
        let view = CongestedWeights::new(&wm, &cm);
        assert_eq!(view.weight(0, 1), 2.0);
        assert_eq!(view.weight(1, 2), 3.0);
    }

    #[test]
    fn test_quadratic_penalty() {
        let wm = WeightMatrix::from_edges(2, &[(0, 1, 1.5)]);
        let shared = vec![Path::from(vec![0, 1]); 2];
        let cm = CongestionMatrix::build(2, &shared);
        let view = CongestedWeights::new(&wm, &cm);
        assert!((view.weight(0, 1) - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_edge_stays_missing() {
        let wm = WeightMatrix::new(2);
        let cm = CongestionMatrix::new(2);
        let view = CongestedWeights::new(&wm, &cm);
        assert_eq!(view.weight(0, 1), NO_EDGE);
        assert!(!view.is_traversable(0, 1));
    }

    #[test]
    fn test_total_cost() {
        let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.0), (1, 2, 2.0)]);
        let paths = vec![Path::from(vec![0, 1, 2]), Path::from(vec![0, 1]), Path::empty()];
        let cm = CongestionMatrix::build(3, &paths);
        let view = CongestedWeights::new(&wm, &cm);
        // Edge (0,1) used twice: 1·4 per traversal, two traversals. Edge (1,2) once: 2.
        assert!((view.total_cost(&paths) - 10.0).abs() < 1e-10);
    }

    #[test]
    #[should_panic(expected = "size must match")]
    fn test_size_mismatch_panics() {
        let wm = WeightMatrix::new(2);
        let cm = CongestionMatrix::new(3);
        let _ = CongestedWeights::new(&wm, &cm);
    }
}
