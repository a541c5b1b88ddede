//! Routing outcome types.

use serde::{Deserialize, Serialize};

use super::Path;
use crate::congestion::CongestionMatrix;

/// Total congestion-weighted cost recorded after one iteration.
///
/// Iteration `0` is the uncongested bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSnapshot {
    /// Iteration index (`0` = bootstrap).
    pub iteration: usize,
    /// Sum of congestion-weighted edge costs over all routed vehicles.
    pub cost: f64,
}

/// Result of a congestion-aware routing run.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_traffic::congestion::{CongestionAwareRouter, RouterConfig};
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::models::VehicleRoute;
///
/// let wm = WeightMatrix::from_edges(2, &[(0, 1, 3.0)]);
/// let router = CongestionAwareRouter::new(&wm, RouterConfig::default()).unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let outcome = router.solve(&[VehicleRoute::new(0, 1)], &mut rng).unwrap();
/// assert_eq!(outcome.num_vehicles(), 1);
/// assert_eq!(outcome.cost_history.len(), 16);
/// assert!((outcome.final_cost - 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingOutcome {
    /// Uncongested shortest paths computed at bootstrap.
    pub initial_paths: Vec<Path>,
    /// Paths after the last iteration, one per vehicle in input order.
    pub final_paths: Vec<Path>,
    /// One snapshot for the bootstrap plus one per iteration.
    pub cost_history: Vec<CostSnapshot>,
    /// Cost of the last snapshot.
    pub final_cost: f64,
    /// Edge usage of `final_paths`.
    pub congestion: CongestionMatrix,
    /// Vehicles whose destination was unreachable (empty path).
    pub unrouted: Vec<usize>,
}

impl RoutingOutcome {
    /// Number of vehicles routed in this run.
    pub fn num_vehicles(&self) -> usize {
        self.final_paths.len()
    }

    /// Vehicles whose final path differs from their bootstrap path.
    pub fn changed_vehicles(&self) -> Vec<usize> {
        self.initial_paths
            .iter()
            .zip(&self.final_paths)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect()
    }

    /// Relative cost reduction from bootstrap to the final iteration, in percent.
    ///
    /// Returns `0.0` when the bootstrap cost is zero.
    pub fn improvement_percent(&self) -> f64 {
        match self.cost_history.first() {
            Some(first) if first.cost > 0.0 => (first.cost - self.final_cost) / first.cost * 100.0,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(initial: Vec<Path>, last: Vec<Path>, costs: &[f64]) -> RoutingOutcome {
        let congestion = CongestionMatrix::build(4, &last);
        RoutingOutcome {
            initial_paths: initial,
            final_paths: last,
            cost_history: costs
                .iter()
                .enumerate()
                .map(|(iteration, &cost)| CostSnapshot { iteration, cost })
                .collect(),
            final_cost: *costs.last().expect("non-empty"),
            congestion,
            unrouted: vec![],
        }
    }

    #[test]
    fn test_changed_vehicles() {
        let o = outcome(
            vec![Path::from(vec![0, 1, 2]), Path::from(vec![0, 1])],
            vec![Path::from(vec![0, 3, 2]), Path::from(vec![0, 1])],
            &[10.0, 8.0],
        );
        assert_eq!(o.num_vehicles(), 2);
        assert_eq!(o.changed_vehicles(), vec![0]);
    }

    #[test]
    fn test_improvement_percent() {
        let paths = vec![Path::from(vec![0, 1])];
        let o = outcome(paths.clone(), paths.clone(), &[10.0, 9.0, 8.0]);
        assert!((o.improvement_percent() - 20.0).abs() < 1e-10);

        let o = outcome(paths.clone(), paths, &[0.0]);
        assert_eq!(o.improvement_percent(), 0.0);
    }
}
