//! Boolean transitive closure of a weight matrix.
//!
//! # Algorithm
//!
//! Start from the direct relation `R[i][j] = (i == j) || w[i][j]` finite,
//! then repeatedly compose the matrix with itself,
//!
//! ```text
//! R' = R ∨ (R ∘ R)
//! ```
//!
//! until a fixed point is reached. Each squaring doubles the path length
//! covered, so at most ⌈log₂ n⌉ + 1 rounds are needed.
//!
//! Rows are packed into `u64` words so the inner OR runs 64 columns at a
//! time.
//!
//! # Complexity
//!
//! O(n³ / 64) per round, O(n³ log n / 64) total.

use super::EdgeWeights;

const WORD_BITS: usize = 64;

/// A square boolean matrix where `reaches(i, j)` means a finite-weight path
/// leads from `i` to `j`.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::{WeightMatrix, ReachabilityMatrix};
///
/// let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
/// let reach = ReachabilityMatrix::from_weights(&wm);
/// assert!(reach.reaches(0, 2));
/// assert!(reach.reaches(2, 2));
/// assert!(!reach.reaches(2, 0));
/// assert_eq!(reach.closure(), reach);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityMatrix {
    bits: Vec<u64>,
    size: usize,
    words: usize,
}

impl ReachabilityMatrix {
    /// Creates an all-false matrix.
    pub fn new(size: usize) -> Self {
        let words = size.div_ceil(WORD_BITS);
        Self {
            bits: vec![0; size * words],
            size,
            words,
        }
    }

    /// Direct (one-hop) reachability: the diagonal plus every finite edge.
    pub fn adjacency<W: EdgeWeights + ?Sized>(weights: &W) -> Self {
        let n = weights.size();
        let mut m = Self::new(n);
        for i in 0..n {
            m.set(i, i);
            for j in 0..n {
                let w = weights.weight(i, j);
                if w.is_finite() && w >= 0.0 {
                    m.set(i, j);
                }
            }
        }
        m
    }

    /// Full reachability closure of a weighted graph.
    pub fn from_weights<W: EdgeWeights + ?Sized>(weights: &W) -> Self {
        Self::adjacency(weights).closure()
    }

    /// Returns the transitive closure of this relation.
    ///
    /// Idempotent: `m.closure().closure() == m.closure()`.
    pub fn closure(&self) -> Self {
        let mut current = self.clone();
        loop {
            let next = current.compose_or();
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// `self ∨ (self ∘ self)`.
    fn compose_or(&self) -> Self {
        let mut next = self.clone();
        let w = self.words;
        for i in 0..self.size {
            for k in 0..self.size {
                if i == k || !self.reaches(i, k) {
                    continue;
                }
                let src = &self.bits[k * w..(k + 1) * w];
                let dst = &mut next.bits[i * w..(i + 1) * w];
                for (d, s) in dst.iter_mut().zip(src) {
                    *d |= *s;
                }
            }
        }
        next
    }

    /// Returns `true` if `to` is reachable from `from`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn reaches(&self, from: usize, to: usize) -> bool {
        assert!(to < self.size, "node {to} out of range");
        let word = self.bits[from * self.words + to / WORD_BITS];
        word & (1u64 << (to % WORD_BITS)) != 0
    }

    /// Marks `to` as reachable from `from`.
    pub fn set(&mut self, from: usize, to: usize) {
        assert!(to < self.size, "node {to} out of range");
        self.bits[from * self.words + to / WORD_BITS] |= 1u64 << (to % WORD_BITS);
    }

    /// Nodes reachable from `from`, in increasing index order.
    pub fn reachable_from(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |&to| self.reaches(from, to))
    }

    /// Nodes lying on some path `start → node → end`, in increasing index order.
    pub fn between(&self, start: usize, end: usize) -> Vec<usize> {
        (0..self.size)
            .filter(|&node| self.reaches(start, node) && self.reaches(node, end))
            .collect()
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }
}
