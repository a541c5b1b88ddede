//! Iterative congestion-aware rerouting.
//!
//! # Algorithm
//!
//! 1. **Bootstrap**: every vehicle takes its uncongested shortest path
//!    (computed in parallel).
//! 2. **Iterate**: rebuild edge usage from the current paths, then pick
//!    `⌊vehicles · reroute_fraction⌋` vehicles uniformly at random without
//!    replacement. Each picked vehicle, in pick order, withdraws its own
//!    path from the usage counts, searches again under the congestion-weighted
//!    costs left by the vehicles before it, and re-enters with the new path
//!    (or its old one if the destination became unreachable).
//! 3. Record the total congestion-weighted cost after each iteration.
//!
//! This is a local search: it settles into a state where no picked vehicle
//! can improve its own cost, not a global optimum.
//!
//! The reroute batch is strictly sequential; each vehicle must observe the
//! usage left by the previous one.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{CongestedWeights, CongestionMatrix};
use crate::error::{Result, TrafficError};
use crate::graph::WeightMatrix;
use crate::models::{validate_routes, CostSnapshot, Path, RoutingOutcome, VehicleRoute};
use crate::pathfinding::{find_shortest_path, shortest_paths_all};

/// Parameters of a rerouting run.
///
/// # Examples
///
/// ```
/// use u_traffic::congestion::RouterConfig;
///
/// let config = RouterConfig::default()
///     .with_iterations(5)
///     .with_reroute_fraction(0.25);
/// assert!(config.validate().is_ok());
/// assert!(RouterConfig::default().with_reroute_fraction(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Number of reroute iterations after the bootstrap.
    pub iterations: usize,
    /// Share of vehicles reconsidered per iteration, in `[0, 1]`.
    pub reroute_fraction: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            iterations: 15,
            reroute_fraction: 0.1,
        }
    }
}

impl RouterConfig {
    /// Sets the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the reroute fraction.
    pub fn with_reroute_fraction(mut self, fraction: f64) -> Self {
        self.reroute_fraction = fraction;
        self
    }

    /// Rejects a NaN or out-of-range reroute fraction.
    pub fn validate(&self) -> Result<()> {
        if (0.0..=1.0).contains(&self.reroute_fraction) {
            Ok(())
        } else {
            Err(TrafficError::InvalidRerouteFraction(self.reroute_fraction))
        }
    }

    /// Number of vehicles reconsidered per iteration for a fleet of `num_vehicles`.
    pub fn batch_size(&self, num_vehicles: usize) -> usize {
        let k = (num_vehicles as f64 * self.reroute_fraction).floor() as usize;
        k.min(num_vehicles)
    }
}

/// Routes a batch of vehicles while accounting for the congestion they cause.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use u_traffic::congestion::{CongestionAwareRouter, RouterConfig};
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::models::VehicleRoute;
///
/// // Two parallel roads 0→1→3 and 0→2→3 of equal length.
/// let wm = WeightMatrix::from_edges(4, &[
///     (0, 1, 1.0), (1, 3, 1.0), (0, 2, 1.0), (2, 3, 1.0),
/// ]);
/// let routes = vec![VehicleRoute::new(0, 3); 3];
/// let config = RouterConfig::default().with_iterations(3).with_reroute_fraction(1.0);
/// let router = CongestionAwareRouter::new(&wm, config).unwrap();
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let outcome = router.solve(&routes, &mut rng).unwrap();
///
/// // All three start on the lower-indexed road (each edge costs 1·3²);
/// // the first vehicle reconsidered moves to the empty road.
/// assert_eq!(outcome.cost_history[0].cost, 54.0);
/// assert_eq!(outcome.final_cost, 18.0);
/// let via_two = outcome.final_paths.iter().filter(|p| p.nodes() == [0, 2, 3]).count();
/// assert_eq!(via_two, 1);
/// ```
#[derive(Debug, Clone)]
pub struct CongestionAwareRouter<'a> {
    weights: &'a WeightMatrix,
    config: RouterConfig,
}

impl<'a> CongestionAwareRouter<'a> {
    /// Creates a router over `weights`.
    ///
    /// # Errors
    ///
    /// [`TrafficError::InvalidRerouteFraction`] if the config is invalid.
    pub fn new(weights: &'a WeightMatrix, config: RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { weights, config })
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Runs bootstrap plus `config.iterations` reroute iterations.
    ///
    /// `rng` drives vehicle selection; seeding it makes the run reproducible.
    ///
    /// # Errors
    ///
    /// [`TrafficError::NodeOutOfRange`] if any route endpoint lies outside
    /// the graph. Unreachable destinations are not errors: the vehicle keeps
    /// an empty path and is listed in [`RoutingOutcome::unrouted`].
    pub fn solve<R: Rng + ?Sized>(
        &self,
        routes: &[VehicleRoute],
        rng: &mut R,
    ) -> Result<RoutingOutcome> {
        let n = self.weights.size();
        validate_routes(routes, n)?;

        info!(
            nodes = n,
            vehicles = routes.len(),
            iterations = self.config.iterations,
            reroute_fraction = self.config.reroute_fraction,
            "starting congestion-aware routing"
        );

        let initial_paths = shortest_paths_all(self.weights, routes)?;
        for (vehicle, path) in initial_paths.iter().enumerate() {
            if path.is_empty() {
                let route = routes[vehicle];
                warn!(vehicle, start = route.start, end = route.end, "route unreachable");
            }
        }

        let mut paths = initial_paths.clone();
        let mut congestion = CongestionMatrix::build(n, &paths);
        let mut cost_history = Vec::with_capacity(self.config.iterations + 1);
        cost_history.push(CostSnapshot {
            iteration: 0,
            cost: CongestedWeights::new(self.weights, &congestion).total_cost(&paths),
        });

        let batch = self.config.batch_size(routes.len());
        for iteration in 1..=self.config.iterations {
            congestion = CongestionMatrix::build(n, &paths);

            let selected = index::sample(&mut *rng, routes.len(), batch);
            let mut changed = 0usize;
            for vehicle in selected.iter() {
                if self.reroute(vehicle, routes[vehicle], &mut paths, &mut congestion)? {
                    changed += 1;
                }
            }

            let cost = CongestedWeights::new(self.weights, &congestion).total_cost(&paths);
            debug!(iteration, rerouted = batch, changed, cost, "iteration complete");
            cost_history.push(CostSnapshot { iteration, cost });
        }

        let final_cost = cost_history.last().map_or(0.0, |s| s.cost);
        let unrouted: Vec<usize> = paths
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_empty())
            .map(|(i, _)| i)
            .collect();

        info!(
            final_cost,
            initial_cost = cost_history[0].cost,
            unrouted = unrouted.len(),
            "congestion-aware routing finished"
        );

        Ok(RoutingOutcome {
            initial_paths,
            final_paths: paths,
            cost_history,
            final_cost,
            congestion,
            unrouted,
        })
    }

    /// Withdraws `vehicle`, searches under current congestion, and re-enters.
    ///
    /// Returns `true` if the vehicle's path changed. The usage counts are
    /// balanced on every exit: whatever path the vehicle ends up holding is
    /// added back.
    fn reroute(
        &self,
        vehicle: usize,
        route: VehicleRoute,
        paths: &mut [Path],
        congestion: &mut CongestionMatrix,
    ) -> Result<bool> {
        congestion.remove_path(&paths[vehicle]);

        let candidate = {
            let view = CongestedWeights::new(self.weights, congestion);
            find_shortest_path(&view, route.start, route.end)?
        };

        let changed = !candidate.is_empty() && candidate != paths[vehicle];
        if changed {
            paths[vehicle] = candidate;
        }
        congestion.add_path(&paths[vehicle]);
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::path_cost;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cycle4() -> WeightMatrix {
        WeightMatrix::from_edges(
            4,
            &[
                (0, 1, 1.0),
                (1, 0, 1.0),
                (1, 2, 1.0),
                (2, 1, 1.0),
                (2, 3, 1.0),
                (3, 2, 1.0),
                (3, 0, 1.0),
                (0, 3, 1.0),
            ],
        )
    }

    fn run(
        wm: &WeightMatrix,
        routes: &[VehicleRoute],
        iterations: usize,
        fraction: f64,
        seed: u64,
    ) -> RoutingOutcome {
        let config = RouterConfig::default()
            .with_iterations(iterations)
            .with_reroute_fraction(fraction);
        let router = CongestionAwareRouter::new(wm, config).expect("valid config");
        let mut rng = StdRng::seed_from_u64(seed);
        router.solve(routes, &mut rng).expect("valid routes")
    }

    #[test]
    fn test_single_vehicle_cost_constant() {
        let wm = cycle4();
        let outcome = run(&wm, &[VehicleRoute::new(0, 2)], 3, 1.0, 42);
        assert_eq!(outcome.cost_history.len(), 4);
        for (i, snap) in outcome.cost_history.iter().enumerate() {
            assert_eq!(snap.iteration, i);
            assert!((snap.cost - 2.0).abs() < 1e-10);
        }
        assert_eq!(outcome.final_paths[0].nodes(), &[0, 1, 2]);
    }

    #[test]
    fn test_zero_fraction_keeps_bootstrap() {
        let wm = cycle4();
        let routes = vec![VehicleRoute::new(0, 2); 5];
        let outcome = run(&wm, &routes, 10, 0.0, 3);
        assert_eq!(outcome.final_paths, outcome.initial_paths);
        assert!(outcome.changed_vehicles().is_empty());
        let first = outcome.cost_history[0].cost;
        assert!(outcome.cost_history.iter().all(|s| s.cost == first));
    }

    #[test]
    fn test_zero_iterations() {
        let wm = cycle4();
        let outcome = run(&wm, &[VehicleRoute::new(0, 2)], 0, 1.0, 0);
        assert_eq!(outcome.cost_history.len(), 1);
        assert_eq!(outcome.final_paths, outcome.initial_paths);
    }

    #[test]
    fn test_two_vehicles_share_without_penalty() {
        // With its own usage withdrawn, a vehicle sees the other one's edges at
        // count 1, i.e. at base weight, so the tie-break keeps it in place.
        let wm = cycle4();
        let routes = vec![VehicleRoute::new(0, 2); 2];
        let outcome = run(&wm, &routes, 4, 1.0, 11);
        assert!((outcome.cost_history[0].cost - 16.0).abs() < 1e-10);
        assert!((outcome.final_cost - 16.0).abs() < 1e-10);
        assert_eq!(outcome.final_paths, outcome.initial_paths);
    }

    #[test]
    fn test_contention_spreads_vehicles() {
        let wm = cycle4();
        let routes = vec![VehicleRoute::new(0, 2); 3];
        let outcome = run(&wm, &routes, 4, 1.0, 11);
        // Bootstrap: all on [0,1,2], each edge used three times → 3 · 2 · 9 = 54.
        assert!((outcome.cost_history[0].cost - 54.0).abs() < 1e-10);
        // Two stay (2 · 2 · 4) and one detours (2 · 1).
        assert!((outcome.final_cost - 18.0).abs() < 1e-10);
        let mut finals: Vec<Vec<usize>> = outcome
            .final_paths
            .iter()
            .map(|p| p.nodes().to_vec())
            .collect();
        finals.sort();
        assert_eq!(finals, vec![vec![0, 1, 2], vec![0, 1, 2], vec![0, 3, 2]]);
        assert_eq!(outcome.congestion.get(0, 3), 1);
        assert_eq!(outcome.congestion.get(0, 1), 2);
    }

    #[test]
    fn test_unreachable_keeps_empty_path() {
        let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.0)]);
        let routes = vec![VehicleRoute::new(0, 1), VehicleRoute::new(1, 2)];
        let outcome = run(&wm, &routes, 3, 1.0, 5);
        assert_eq!(outcome.unrouted, vec![1]);
        assert!(outcome.final_paths[1].is_empty());
        assert_eq!(outcome.final_paths[0].nodes(), &[0, 1]);
        assert!((outcome.final_cost - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_route_is_error() {
        let wm = cycle4();
        let router = CongestionAwareRouter::new(&wm, RouterConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            router.solve(&[VehicleRoute::new(0, 4)], &mut rng).unwrap_err(),
            TrafficError::NodeOutOfRange { node: 4, size: 4 }
        );
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        let wm = cycle4();
        let config = RouterConfig::default().with_reroute_fraction(f64::NAN);
        assert!(matches!(
            CongestionAwareRouter::new(&wm, config),
            Err(TrafficError::InvalidRerouteFraction(_))
        ));
        let config = RouterConfig::default().with_reroute_fraction(-0.1);
        assert!(CongestionAwareRouter::new(&wm, config).is_err());
    }

    #[test]
    fn test_batch_size_floors() {
        let config = RouterConfig::default().with_reroute_fraction(0.25);
        assert_eq!(config.batch_size(10), 2);
        assert_eq!(config.batch_size(3), 0);
        assert_eq!(RouterConfig::default().with_reroute_fraction(1.0).batch_size(7), 7);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let wm = cycle4();
        let routes: Vec<VehicleRoute> = (0..12).map(|i| VehicleRoute::new(i % 4, (i + 2) % 4)).collect();
        let a = run(&wm, &routes, 6, 0.5, 99);
        let b = run(&wm, &routes, 6, 0.5, 99);
        assert_eq!(a.final_paths, b.final_paths);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: RouterConfig = serde_json::from_str(r#"{"iterations": 3}"#).unwrap();
        assert_eq!(config.iterations, 3);
        assert_eq!(config.reroute_fraction, 0.1);
    }

    fn grid3() -> WeightMatrix {
        // 3×3 bidirectional grid, unit weights.
        let mut edges = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                let v = r * 3 + c;
                if c + 1 < 3 {
                    edges.push((v, v + 1, 1.0));
                    edges.push((v + 1, v, 1.0));
                }
                if r + 1 < 3 {
                    edges.push((v, v + 3, 1.0));
                    edges.push((v + 3, v, 1.0));
                }
            }
        }
        WeightMatrix::from_edges(9, &edges)
    }

    proptest! {
        #[test]
        fn prop_paths_valid_and_congestion_consistent(
            pairs in prop::collection::vec((0usize..9, 0usize..9), 1..12),
            fraction in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let wm = grid3();
            let routes: Vec<VehicleRoute> = pairs.into_iter().map(VehicleRoute::from).collect();
            let outcome = run(&wm, &routes, 4, fraction, seed);

            prop_assert_eq!(outcome.cost_history.len(), 5);
            prop_assert_eq!(&outcome.congestion, &CongestionMatrix::build(9, &outcome.final_paths));
            for (route, path) in routes.iter().zip(&outcome.final_paths) {
                prop_assert!(path.serves(route));
                prop_assert!(path_cost(&wm, path).is_finite());
            }
        }

        #[test]
        fn prop_changes_bounded_by_batch(
            pairs in prop::collection::vec((0usize..9, 0usize..9), 1..12),
            fraction in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let wm = grid3();
            let routes: Vec<VehicleRoute> = pairs.into_iter().map(VehicleRoute::from).collect();
            let outcome = run(&wm, &routes, 1, fraction, seed);
            let bound = RouterConfig::default().with_reroute_fraction(fraction).batch_size(routes.len());
            prop_assert!(outcome.changed_vehicles().len() <= bound);
        }
    }
}
