//! Sparse QUBO coefficient map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sparse upper-triangular QUBO: `(i, j)` with `i ≤ j` → coefficient.
///
/// Diagonal entries are linear terms. The objective of an assignment `x` is
/// `Σ Q[i][j] · x_i · x_j` over stored entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuboModel {
    terms: BTreeMap<(usize, usize), f64>,
    num_variables: usize,
}

impl QuboModel {
    /// Creates an empty model over `num_variables` binary variables.
    pub fn new(num_variables: usize) -> Self {
        Self {
            terms: BTreeMap::new(),
            num_variables,
        }
    }

    /// Accumulates `value` into the `(min(i,j), max(i,j))` slot.
    ///
    /// Exact zeros are skipped so they never create a slot.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= num_variables`.
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        assert!(
            i < self.num_variables && j < self.num_variables,
            "variable index out of range"
        );
        if value == 0.0 {
            return;
        }
        *self.terms.entry((i.min(j), i.max(j))).or_insert(0.0) += value;
    }

    /// Adds a linear (diagonal) term.
    pub fn add_linear(&mut self, i: usize, value: f64) {
        self.add(i, i, value);
    }

    /// Coefficient of `(i, j)` in either order; `0.0` if absent.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.terms
            .get(&(i.min(j), i.max(j)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Stored terms in canonical key order.
    pub fn terms(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.terms.iter().map(|(&k, &v)| (k, v))
    }

    /// Number of stored terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of binary variables.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Objective value for a binary assignment.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != num_variables`.
    pub fn objective(&self, x: &[bool]) -> f64 {
        assert_eq!(x.len(), self.num_variables, "assignment length mismatch");
        self.terms
            .iter()
            .filter(|&(&(i, j), _)| x[i] && x[j])
            .map(|(_, &q)| q)
            .sum()
    }
}
