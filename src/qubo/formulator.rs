//! Penalty-based QUBO formulation of vehicle sub-problems.
//!
//! Each vehicle `(s, t)` of the subset is unrolled over time steps
//! `0..=horizon`. Variable `(v, step, node)` is 1 when vehicle `v` is at
//! `node` at `step`. Only nodes on some `s → node → t` path are candidates.
//!
//! # Terms
//!
//! | Term | Weight | Coefficients |
//! |------|--------|--------------|
//! | Endpoint | `endpoints` | step 0: `+P` on `s`, `−P` elsewhere; step `horizon`: same for `t` |
//! | One-hot per step | `one_hot` | `−P` per variable, `+2P` per pair in the group |
//! | Flow | `flow` | `+P` per transition `i → j`, `i ≠ j`, with no edge |
//! | Cost | `cost` | `+P·w(i, j)` per transition `i → j`, `i ≠ j`, with an edge |

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{qubo_to_ising, IsingExport, IsingModel, QuboModel, VariableIndex, VariableKey};
use crate::error::{Result, TrafficError};
use crate::graph::{ReachabilityMatrix, WeightMatrix};
use crate::models::{validate_routes, VehicleRoute};

/// Penalty multipliers for the four QUBO terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    /// Start/end node bias.
    pub endpoints: f64,
    /// Exactly one node per (vehicle, step).
    pub one_hot: f64,
    /// Transitions without an edge.
    pub flow: f64,
    /// Multiplier on edge weights of transitions.
    pub cost: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            endpoints: 10.0,
            one_hot: 5.0,
            flow: 2.0,
            cost: 1.0,
        }
    }
}

/// Size limits of a sub-problem.
///
/// # Examples
///
/// ```
/// use u_traffic::qubo::SubproblemConfig;
///
/// let config = SubproblemConfig::default().with_max_qubits(16).with_max_steps(3);
/// assert_eq!(config.max_qubits, 16);
/// assert_eq!(config.horizon(10), 3);
/// assert_eq!(SubproblemConfig::default().horizon(10), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubproblemConfig {
    /// Upper bound on the number of variables.
    pub max_qubits: usize,
    /// Last time step; `None` means `nodes − 1`.
    pub max_steps: Option<usize>,
}

impl Default for SubproblemConfig {
    fn default() -> Self {
        Self {
            max_qubits: 64,
            max_steps: None,
        }
    }
}

impl SubproblemConfig {
    /// Sets the variable budget.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Sets the last time step.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Effective last time step on a graph with `nodes` nodes, clamped to
    /// `nodes − 1`.
    pub fn horizon(&self, nodes: usize) -> usize {
        let longest = nodes.saturating_sub(1);
        self.max_steps.map_or(longest, |steps| steps.min(longest))
    }
}

/// A formulated sub-problem: the vehicles, their variables, and the QUBO.
#[derive(Debug, Clone, PartialEq)]
pub struct Subproblem {
    vehicles: Vec<usize>,
    variables: VariableIndex,
    qubo: QuboModel,
    horizon: usize,
}

impl Subproblem {
    /// Vehicle indices in formulation order, without duplicates.
    pub fn vehicles(&self) -> &[usize] {
        &self.vehicles
    }

    /// The variable arena.
    pub fn variables(&self) -> &VariableIndex {
        &self.variables
    }

    /// The QUBO model.
    pub fn qubo(&self) -> &QuboModel {
        &self.qubo
    }

    /// Last time step.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Index of `key`, if it was enumerated.
    pub fn variable(&self, key: &VariableKey) -> Option<usize> {
        self.variables.get(key)
    }

    /// Key of variable `index`.
    pub fn key(&self, index: usize) -> Option<VariableKey> {
        self.variables.key(index)
    }

    /// Energy-equivalent Ising model.
    pub fn to_ising(&self) -> IsingModel {
        qubo_to_ising(&self.qubo)
    }

    /// Serializable bundle of the Ising model and variable mapping.
    pub fn export_ising(&self) -> IsingExport {
        IsingExport::new(&self.vehicles, &self.variables, &self.to_ising())
    }
}

/// Builds QUBO sub-problems over a fixed graph and route batch.
///
/// The reachability closure is computed once on construction and shared by
/// every sub-problem.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::models::VehicleRoute;
/// use u_traffic::qubo::{QuboFormulator, SubproblemConfig, VariableKey};
///
/// let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
/// let routes = vec![VehicleRoute::new(0, 2)];
/// let formulator = QuboFormulator::new(&wm, &routes).unwrap();
///
/// let sub = formulator
///     .create_subproblem(&[0], &SubproblemConfig::default())
///     .unwrap();
/// assert_eq!(sub.num_variables(), 9); // 3 steps × 3 candidate nodes
/// assert_eq!(sub.variable(&VariableKey::new(0, 1, 1)), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct QuboFormulator<'a> {
    weights: &'a WeightMatrix,
    routes: &'a [VehicleRoute],
    reachability: ReachabilityMatrix,
    penalties: PenaltyWeights,
}

impl<'a> QuboFormulator<'a> {
    /// Creates a formulator for `routes` on `weights`.
    ///
    /// Fails if any route endpoint is outside the graph.
    pub fn new(weights: &'a WeightMatrix, routes: &'a [VehicleRoute]) -> Result<Self> {
        validate_routes(routes, weights.size())?;
        Ok(Self {
            weights,
            routes,
            reachability: ReachabilityMatrix::from_weights(weights),
            penalties: PenaltyWeights::default(),
        })
    }

    /// Replaces the penalty weights.
    pub fn with_penalties(mut self, penalties: PenaltyWeights) -> Self {
        self.penalties = penalties;
        self
    }

    /// Current penalty weights.
    pub fn penalties(&self) -> &PenaltyWeights {
        &self.penalties
    }

    /// The cached reachability closure.
    pub fn reachability(&self) -> &ReachabilityMatrix {
        &self.reachability
    }

    /// Formulates the sub-problem for `vehicles`.
    ///
    /// Variables are enumerated vehicle by vehicle (first occurrence order),
    /// step by step, node by node, and enumeration stops as soon as
    /// `max_qubits` variables exist, so later vehicles may be partially
    /// represented or missing.
    ///
    /// # Errors
    ///
    /// - [`TrafficError::EmptyVehicleSubset`] if `vehicles` is empty
    /// - [`TrafficError::ZeroQubitBudget`] if `max_qubits` is zero
    /// - [`TrafficError::VehicleOutOfRange`] for an unknown vehicle
    /// - [`TrafficError::InfeasibleSubproblem`] if no variable survives pruning
    pub fn create_subproblem(
        &self,
        vehicles: &[usize],
        config: &SubproblemConfig,
    ) -> Result<Subproblem> {
        if vehicles.is_empty() {
            return Err(TrafficError::EmptyVehicleSubset);
        }
        if config.max_qubits == 0 {
            return Err(TrafficError::ZeroQubitBudget);
        }

        let mut seen = HashSet::new();
        let mut subset = Vec::with_capacity(vehicles.len());
        for &vehicle in vehicles {
            if vehicle >= self.routes.len() {
                return Err(TrafficError::VehicleOutOfRange {
                    vehicle,
                    count: self.routes.len(),
                });
            }
            if seen.insert(vehicle) {
                subset.push(vehicle);
            }
        }

        let horizon = config.horizon(self.weights.size());
        let variables = self.enumerate(&subset, horizon, config.max_qubits);
        if variables.is_empty() {
            return Err(TrafficError::InfeasibleSubproblem { vehicles: subset });
        }

        let qubo = self.build_qubo(&subset, &variables, horizon);

        info!(
            vehicles = subset.len(),
            variables = variables.len(),
            terms = qubo.num_terms(),
            horizon,
            "subproblem created"
        );

        Ok(Subproblem {
            vehicles: subset,
            variables,
            qubo,
            horizon,
        })
    }

    fn enumerate(&self, vehicles: &[usize], horizon: usize, max_qubits: usize) -> VariableIndex {
        let mut variables = VariableIndex::new();

        'vehicles: for &vehicle in vehicles {
            let route = self.routes[vehicle];
            let candidates = self.reachability.between(route.start, route.end);
            for step in 0..=horizon {
                for &node in &candidates {
                    if variables.len() >= max_qubits {
                        break 'vehicles;
                    }
                    variables.push(VariableKey::new(vehicle, step, node));
                }
            }
        }

        variables
    }

    fn build_qubo(&self, vehicles: &[usize], variables: &VariableIndex, horizon: usize) -> QuboModel {
        let p = &self.penalties;
        let mut qubo = QuboModel::new(variables.len());

        // (vehicle, step) → [(node, index)], nodes ascending from enumeration
        let mut groups: BTreeMap<(usize, usize), Vec<(usize, usize)>> = BTreeMap::new();
        for (index, key) in variables.iter() {
            groups
                .entry((key.vehicle, key.step))
                .or_default()
                .push((key.node, index));
        }
        let group = |vehicle: usize, step: usize| {
            groups
                .get(&(vehicle, step))
                .map(Vec::as_slice)
                .unwrap_or(&[])
        };

        for &vehicle in vehicles {
            let route = self.routes[vehicle];

            for &(node, index) in group(vehicle, 0) {
                let sign = if node == route.start { 1.0 } else { -1.0 };
                qubo.add_linear(index, sign * p.endpoints);
            }
            for &(node, index) in group(vehicle, horizon) {
                let sign = if node == route.end { 1.0 } else { -1.0 };
                qubo.add_linear(index, sign * p.endpoints);
            }

            for step in 0..=horizon {
                let members = group(vehicle, step);
                for (a, &(_, qa)) in members.iter().enumerate() {
                    qubo.add_linear(qa, -p.one_hot);
                    for &(_, qb) in &members[a + 1..] {
                        qubo.add(qa, qb, 2.0 * p.one_hot);
                    }
                }
            }

            for step in 0..horizon {
                let next = group(vehicle, step + 1);
                for &(i, qi) in group(vehicle, step) {
                    for &(j, qj) in next {
                        if i == j {
                            continue;
                        }
                        if self.weights.has_edge(i, j) {
                            qubo.add(qi, qj, p.cost * self.weights.get(i, j));
                        } else {
                            qubo.add(qi, qj, p.flow);
                        }
                    }
                }
            }
        }

        qubo
    }
}
