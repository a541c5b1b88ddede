//! Dense edge-weight matrix.

use crate::error::{Result, TrafficError};

/// Sentinel weight meaning "no edge between these nodes".
pub const NO_EDGE: f64 = f64::INFINITY;

/// Read-only access to an `n × n` matrix of directed edge weights.
///
/// Path search and reachability are written against this trait so that the
/// congestion router can hand them a live, congestion-adjusted view instead
/// of materializing a new matrix for every reroute.
pub trait EdgeWeights {
    /// Number of nodes.
    fn size(&self) -> usize;

    /// Weight of the directed edge `from → to`, or [`NO_EDGE`].
    fn weight(&self, from: usize, to: usize) -> f64;

    /// Returns `true` if `from → to` can be traversed by a path search.
    ///
    /// Self-loops and the [`NO_EDGE`] sentinel are never traversable.
    fn is_traversable(&self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let w = self.weight(from, to);
        w.is_finite() && w >= 0.0
    }
}

/// A dense n×n matrix of non-negative edge weights stored in row-major order.
///
/// Entries are either a finite weight `≥ 0` or [`NO_EDGE`]. Negative and NaN
/// weights are rejected on construction, so every `WeightMatrix` is valid.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::{WeightMatrix, EdgeWeights, NO_EDGE};
///
/// let wm = WeightMatrix::from_edges(3, &[(0, 1, 2.0), (1, 2, 3.0)]);
/// assert_eq!(wm.get(0, 1), 2.0);
/// assert_eq!(wm.get(1, 0), NO_EDGE);
/// assert_eq!(wm.get(2, 2), 0.0);
/// assert!(wm.is_traversable(1, 2));
/// assert_eq!(wm.edge_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    data: Vec<f64>,
    size: usize,
}

impl WeightMatrix {
    /// Creates a graph of `size` nodes with no edges and a zero diagonal.
    pub fn new(size: usize) -> Self {
        let mut data = vec![NO_EDGE; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self { data, size }
    }

    /// Builds a graph from directed `(from, to, weight)` triples.
    ///
    /// Starts from [`WeightMatrix::new`] and writes each edge. Triples with an
    /// endpoint outside the graph, or with a negative or NaN weight, are
    /// skipped.
    pub fn from_edges(size: usize, edges: &[(usize, usize, f64)]) -> Self {
        let mut wm = Self::new(size);
        for &(from, to, weight) in edges {
            if from < size && to < size && is_valid_weight(weight) {
                wm.data[from * size + to] = weight;
            }
        }
        wm
    }

    /// Creates a weight matrix from an explicit row-major n×n grid.
    ///
    /// # Errors
    ///
    /// [`TrafficError::NonSquareMatrix`] if `data.len() != size * size`, and
    /// [`TrafficError::InvalidWeight`] for any negative or NaN entry.
    pub fn from_data(size: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != size * size {
            return Err(TrafficError::NonSquareMatrix {
                rows: size,
                len: data.len(),
            });
        }
        for (idx, &value) in data.iter().enumerate() {
            if !is_valid_weight(value) {
                return Err(TrafficError::InvalidWeight {
                    from: idx / size,
                    to: idx % size,
                    value,
                });
            }
        }
        Ok(Self { data, size })
    }

    /// Creates a weight matrix from nested rows.
    ///
    /// # Errors
    ///
    /// [`TrafficError::NonSquareMatrix`] if any row length differs from the
    /// number of rows, plus the weight checks of [`WeightMatrix::from_data`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return Err(TrafficError::NonSquareMatrix {
                rows: size,
                len: rows.iter().map(Vec::len).sum(),
            });
        }
        Self::from_data(size, rows.concat())
    }

    /// Returns the weight from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the weight of the directed edge `from → to`.
    ///
    /// Pass [`NO_EDGE`] to remove an edge.
    pub fn set(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        self.check_node(from)?;
        self.check_node(to)?;
        if !is_valid_weight(weight) {
            return Err(TrafficError::InvalidWeight {
                from,
                to,
                value: weight,
            });
        }
        self.data[from * self.size + to] = weight;
        Ok(())
    }

    /// Number of nodes in this graph.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if a finite-weight edge `from → to` exists.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.get(from, to).is_finite()
    }

    /// Number of finite off-diagonal edges.
    pub fn edge_count(&self) -> usize {
        let n = self.size;
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j && self.has_edge(i, j))
            .count()
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    ///
    /// Two [`NO_EDGE`] entries are considered equal.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a.is_infinite() || b.is_infinite() {
                    if a != b {
                        return false;
                    }
                } else if (a - b).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Validates that `node` names a node of this graph.
    pub fn check_node(&self, node: usize) -> Result<()> {
        if node < self.size {
            Ok(())
        } else {
            Err(TrafficError::NodeOutOfRange {
                node,
                size: self.size,
            })
        }
    }
}

impl EdgeWeights for WeightMatrix {
    fn size(&self) -> usize {
        self.size
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }
}

fn is_valid_weight(w: f64) -> bool {
    !w.is_nan() && w >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_edges() {
        let wm = WeightMatrix::new(3);
        assert_eq!(wm.size(), 3);
        assert_eq!(wm.edge_count(), 0);
        assert_eq!(wm.get(1, 1), 0.0);
        assert_eq!(wm.get(0, 2), NO_EDGE);
    }

    #[test]
    fn test_from_edges_skips_out_of_range() {
        let wm = WeightMatrix::from_edges(2, &[(0, 1, 4.0), (0, 5, 1.0), (1, 0, -1.0)]);
        assert_eq!(wm.get(0, 1), 4.0);
        assert_eq!(wm.get(1, 0), NO_EDGE);
        assert_eq!(wm.edge_count(), 1);
    }

    #[test]
    fn test_from_data() {
        let wm = WeightMatrix::from_data(2, vec![0.0, 5.0, NO_EDGE, 0.0]).expect("valid");
        assert_eq!(wm.get(0, 1), 5.0);
        assert!(!wm.has_edge(1, 0));
    }

    #[test]
    fn test_from_data_invalid_size() {
        let err = WeightMatrix::from_data(2, vec![0.0, 1.0, 2.0]).unwrap_err();
        assert_eq!(err, TrafficError::NonSquareMatrix { rows: 2, len: 3 });
    }

    #[test]
    fn test_from_data_rejects_negative_and_nan() {
        let err = WeightMatrix::from_data(2, vec![0.0, -1.0, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, TrafficError::InvalidWeight { from: 0, to: 1, .. }));
        let err = WeightMatrix::from_data(2, vec![0.0, 1.0, f64::NAN, 0.0]).unwrap_err();
        assert!(matches!(err, TrafficError::InvalidWeight { from: 1, to: 0, .. }));
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(matches!(
            WeightMatrix::from_rows(&rows),
            Err(TrafficError::NonSquareMatrix { rows: 2, .. })
        ));
        let rows = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        assert!(WeightMatrix::from_rows(&rows).expect("square").is_symmetric(1e-10));
    }

    #[test]
    fn test_set_get() {
        let mut wm = WeightMatrix::new(3);
        wm.set(0, 1, 42.0).expect("in range");
        assert_eq!(wm.get(0, 1), 42.0);
        assert_eq!(wm.get(1, 0), NO_EDGE);
        assert!(wm.set(0, 3, 1.0).is_err());
        assert!(wm.set(0, 1, -2.0).is_err());
    }

    #[test]
    fn test_traversable_excludes_self_loops() {
        let mut wm = WeightMatrix::new(2);
        wm.set(0, 1, 1.0).expect("in range");
        assert!(wm.is_traversable(0, 1));
        assert!(!wm.is_traversable(1, 0));
        assert!(!wm.is_traversable(0, 0));
    }

    #[test]
    fn test_asymmetric_matrix() {
        let wm = WeightMatrix::from_edges(2, &[(0, 1, 10.0), (1, 0, 15.0)]);
        assert!(!wm.is_symmetric(1e-10));
        let one_way = WeightMatrix::from_edges(2, &[(0, 1, 10.0)]);
        assert!(!one_way.is_symmetric(1e-10));
    }
}
