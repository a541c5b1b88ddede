//! QUBO → Ising transform.
//!
//! Binary `x ∈ {0, 1}` maps to spin `s ∈ {−1, +1}` via `x = (1 − s) / 2`,
//! so `x = 1` is spin `−1`. Under that substitution
//!
//! - `q·x_i = q/2 − (q/2)·s_i`
//! - `q·x_i·x_j = q/4 − (q/4)·s_i − (q/4)·s_j + (q/4)·s_i·s_j`
//!
//! and the Ising energy equals the QUBO objective for every assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::QuboModel;

/// Ising Hamiltonian `offset + Σ h_i s_i + Σ_{i<j} J_ij s_i s_j`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IsingModel {
    /// Linear fields.
    pub h: BTreeMap<usize, f64>,
    /// Couplings keyed by `(i, j)` with `i < j`.
    pub j: BTreeMap<(usize, usize), f64>,
    /// Constant energy offset.
    pub offset: f64,
    num_spins: usize,
}

impl IsingModel {
    /// Number of spins (the QUBO's variable count).
    pub fn num_spins(&self) -> usize {
        self.num_spins
    }

    /// Energy of a spin assignment. Each entry is read by sign: negative is
    /// spin `−1`, anything else is `+1`.
    ///
    /// # Panics
    ///
    /// Panics if `spins.len() != num_spins`.
    pub fn energy(&self, spins: &[i8]) -> f64 {
        assert_eq!(spins.len(), self.num_spins, "spin count mismatch");
        let s = |i: usize| if spins[i] < 0 { -1.0 } else { 1.0 };

        let linear: f64 = self.h.iter().map(|(&i, &h)| h * s(i)).sum();
        let quadratic: f64 = self.j.iter().map(|(&(i, k), &j)| j * s(i) * s(k)).sum();
        self.offset + linear + quadratic
    }

    /// Spin assignment corresponding to binary `x` (`s = 1 − 2x`).
    pub fn spins_from_binary(x: &[bool]) -> Vec<i8> {
        x.iter().map(|&b| if b { -1 } else { 1 }).collect()
    }
}

/// Converts a QUBO to an energy-equivalent Ising model.
///
/// # Examples
///
/// ```
/// use u_traffic::qubo::{qubo_to_ising, IsingModel, QuboModel};
///
/// let mut q = QuboModel::new(2);
/// q.add(0, 0, -1.0);
/// q.add(0, 1, 2.0);
/// let ising = qubo_to_ising(&q);
///
/// let x = [true, true];
/// let spins = IsingModel::spins_from_binary(&x);
/// assert!((ising.energy(&spins) - q.objective(&x)).abs() < 1e-12);
/// ```
pub fn qubo_to_ising(qubo: &QuboModel) -> IsingModel {
    let mut h: BTreeMap<usize, f64> = BTreeMap::new();
    let mut j: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut offset = 0.0;

    for ((a, b), q) in qubo.terms() {
        if a == b {
            offset += 0.5 * q;
            *h.entry(a).or_insert(0.0) -= 0.5 * q;
        } else {
            let quarter = 0.25 * q;
            offset += quarter;
            *h.entry(a).or_insert(0.0) -= quarter;
            *h.entry(b).or_insert(0.0) -= quarter;
            *j.entry((a, b)).or_insert(0.0) += quarter;
        }
    }

    IsingModel {
        h,
        j,
        offset,
        num_spins: qubo.num_variables(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assignments(n: usize) -> impl Iterator<Item = Vec<bool>> {
        (0u32..(1 << n)).map(move |mask| (0..n).map(|i| mask & (1 << i) != 0).collect())
    }

    #[test]
    fn test_linear_term() {
        let mut q = QuboModel::new(1);
        q.add_linear(0, 4.0);
        let ising = qubo_to_ising(&q);
        assert_eq!(ising.offset, 2.0);
        assert_eq!(ising.h[&0], -2.0);
        assert!(ising.j.is_empty());
        assert_eq!(ising.energy(&[1]), 0.0);
        assert_eq!(ising.energy(&[-1]), 4.0);
    }

    #[test]
    fn test_quadratic_term() {
        let mut q = QuboModel::new(2);
        q.add(1, 0, 8.0);
        let ising = qubo_to_ising(&q);
        assert_eq!(ising.offset, 2.0);
        assert_eq!(ising.h[&0], -2.0);
        assert_eq!(ising.h[&1], -2.0);
        assert_eq!(ising.j[&(0, 1)], 2.0);
        assert_eq!(ising.num_spins(), 2);
    }

    #[test]
    fn test_empty_model() {
        let ising = qubo_to_ising(&QuboModel::new(3));
        assert_eq!(ising.offset, 0.0);
        assert!(ising.h.is_empty());
        assert_eq!(ising.energy(&[1, -1, 1]), 0.0);
    }

    #[test]
    fn test_exhaustive_equivalence() {
        let mut q = QuboModel::new(3);
        q.add_linear(0, 10.0);
        q.add_linear(1, -5.0);
        q.add_linear(2, -5.0);
        q.add(0, 1, 10.0);
        q.add(1, 2, 2.5);
        let ising = qubo_to_ising(&q);
        for x in assignments(3) {
            let spins = IsingModel::spins_from_binary(&x);
            assert!((ising.energy(&spins) - q.objective(&x)).abs() < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn prop_energy_matches_objective(
            n in 1usize..=10,
            raw in prop::collection::vec((0usize..10, 0usize..10, -20.0f64..20.0), 0..30),
        ) {
            let mut q = QuboModel::new(n);
            for (i, j, v) in raw {
                q.add(i % n, j % n, v);
            }
            let ising = qubo_to_ising(&q);
            for x in assignments(n) {
                let spins = IsingModel::spins_from_binary(&x);
                let diff = (ising.energy(&spins) - q.objective(&x)).abs();
                prop_assert!(diff < 1e-9, "diff {} for {:?}", diff, x);
            }
        }
    }
}
