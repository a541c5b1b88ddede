//! Serializable hand-off bundle for external Ising solvers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{IsingModel, VariableIndex};

/// One row of the variable mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableEntry {
    /// Vehicle index.
    pub vehicle: usize,
    /// Time step.
    pub step: usize,
    /// Graph node.
    pub node: usize,
    /// Spin / variable index.
    pub index: usize,
}

/// Ising coefficients plus the variable mapping, keyed for plain JSON.
///
/// Couplings are keyed `"i_j"` since JSON object keys must be strings.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::models::VehicleRoute;
/// use u_traffic::qubo::{QuboFormulator, SubproblemConfig};
///
/// let wm = WeightMatrix::from_edges(2, &[(0, 1, 1.0)]);
/// let routes = vec![VehicleRoute::new(0, 1)];
/// let sub = QuboFormulator::new(&wm, &routes)
///     .unwrap()
///     .create_subproblem(&[0], &SubproblemConfig::default())
///     .unwrap();
///
/// let export = sub.export_ising();
/// assert_eq!(export.num_variables, 4);
/// assert!(export.j.keys().all(|k| k.contains('_')));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsingExport {
    /// Vehicles of the sub-problem.
    pub vehicle_indices: Vec<usize>,
    /// Variable mapping in index order.
    pub variables: Vec<VariableEntry>,
    /// Linear fields.
    pub h: BTreeMap<usize, f64>,
    /// Couplings keyed `"i_j"`.
    #[serde(rename = "J")]
    pub j: BTreeMap<String, f64>,
    /// Constant energy offset.
    pub offset: f64,
    /// Number of variables.
    pub num_variables: usize,
}

impl IsingExport {
    /// Bundles a sub-problem's vehicles and variables with its Ising model.
    pub fn new(vehicles: &[usize], variables: &VariableIndex, ising: &IsingModel) -> Self {
        let variables: Vec<VariableEntry> = variables
            .iter()
            .map(|(index, key)| VariableEntry {
                vehicle: key.vehicle,
                step: key.step,
                node: key.node,
                index,
            })
            .collect();

        Self {
            vehicle_indices: vehicles.to_vec(),
            num_variables: variables.len(),
            variables,
            h: ising.h.clone(),
            j: ising
                .j
                .iter()
                .map(|(&(a, b), &v)| (format!("{a}_{b}"), v))
                .collect(),
            offset: ising.offset,
        }
    }
}
