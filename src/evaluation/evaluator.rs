//! Path cost evaluation and route validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::EdgeWeights;
use crate::models::{Path, VehicleRoute};

/// Sum of edge weights along `path`.
///
/// Returns `+∞` for the empty (unreachable) path or if any hop is not a
/// traversable edge, and `0.0` for a single-node path.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::models::Path;
/// use u_traffic::evaluation::path_cost;
///
/// let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.5), (1, 2, 2.0)]);
/// assert!((path_cost(&wm, &Path::from(vec![0, 1, 2])) - 3.5).abs() < 1e-10);
/// assert!(path_cost(&wm, &Path::from(vec![2, 1])).is_infinite());
/// ```
pub fn path_cost<W: EdgeWeights + ?Sized>(weights: &W, path: &Path) -> f64 {
    if path.is_empty() {
        return f64::INFINITY;
    }
    let mut total = 0.0;
    for (from, to) in path.edges() {
        if !weights.is_traversable(from, to) {
            return f64::INFINITY;
        }
        total += weights.weight(from, to);
    }
    total
}

/// Sum of [`path_cost`] over a set of paths.
pub fn total_cost<W: EdgeWeights + ?Sized>(weights: &W, paths: &[Path]) -> f64 {
    paths.iter().map(|p| path_cost(weights, p)).sum()
}

/// Why a path fails to serve its route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IssueKind {
    /// The path is empty: the destination was unreachable.
    Unrouted,
    /// The path starts or ends at the wrong node.
    WrongEndpoints {
        /// First node of the path.
        start: usize,
        /// Last node of the path.
        end: usize,
    },
    /// Two consecutive nodes are not joined by a traversable edge.
    MissingEdge {
        /// Source node of the hop.
        from: usize,
        /// Target node of the hop.
        to: usize,
    },
}

/// A path that does not serve its route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathIssue {
    /// Index of the route (vehicle) in the batch.
    pub route_index: usize,
    /// The route the path was meant to serve.
    pub expected: VehicleRoute,
    /// The problem found.
    pub kind: IssueKind,
}

/// Summary of checking a path batch against its routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteValidation {
    /// Number of routes checked.
    pub total_routes: usize,
    /// Number of paths that serve their route over real edges.
    pub valid_routes: usize,
    /// One entry per invalid path.
    pub issues: Vec<PathIssue>,
}

impl RouteValidation {
    /// Returns `true` if every path is valid.
    pub fn passed(&self) -> bool {
        self.issues.is_empty() && self.valid_routes == self.total_routes
    }
}

/// Checks that each path starts and ends where its route requires and only
/// uses traversable edges.
///
/// Paths and routes are paired by position; extra entries on either side
/// are ignored, while `total_routes` always counts every route.
///
/// # Examples
///
/// ```
/// use u_traffic::graph::WeightMatrix;
/// use u_traffic::models::{Path, VehicleRoute};
/// use u_traffic::evaluation::{validate_paths, IssueKind};
///
/// let wm = WeightMatrix::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
/// let routes = [VehicleRoute::new(0, 2), VehicleRoute::new(2, 0)];
/// let paths = [Path::from(vec![0, 1, 2]), Path::empty()];
/// let report = validate_paths(&wm, &paths, &routes);
/// assert_eq!(report.valid_routes, 1);
/// assert_eq!(report.issues[0].kind, IssueKind::Unrouted);
/// ```
pub fn validate_paths<W: EdgeWeights + ?Sized>(
    weights: &W,
    paths: &[Path],
    routes: &[VehicleRoute],
) -> RouteValidation {
    let mut issues = Vec::new();

    for (route_index, (path, route)) in paths.iter().zip(routes).enumerate() {
        let kind = match (path.start(), path.end()) {
            (None, _) | (_, None) => Some(IssueKind::Unrouted),
            (Some(start), Some(end)) if start != route.start || end != route.end => {
                Some(IssueKind::WrongEndpoints { start, end })
            }
            _ => path
                .edges()
                .find(|&(from, to)| !weights.is_traversable(from, to))
                .map(|(from, to)| IssueKind::MissingEdge { from, to }),
        };

        if let Some(kind) = kind {
            issues.push(PathIssue {
                route_index,
                expected: *route,
                kind,
            });
        }
    }

    let checked = paths.len().min(routes.len());
    RouteValidation {
        total_routes: routes.len(),
        valid_routes: checked - issues.len(),
        issues,
    }
}

/// Cost comparison of a candidate solution against a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostComparison {
    /// `(baseline − candidate) / baseline · 100`, or `0` for a zero baseline.
    pub improvement_percent: f64,
    /// Baseline is strictly cheaper.
    pub baseline_better: bool,
    /// Candidate is strictly cheaper.
    pub candidate_better: bool,
    /// Costs agree within `0.001`.
    pub equal: bool,
}

/// Compares two total costs.
///
/// # Examples
///
/// ```
/// use u_traffic::evaluation::compare_costs;
///
/// let cmp = compare_costs(200.0, 150.0);
/// assert!((cmp.improvement_percent - 25.0).abs() < 1e-10);
/// assert!(cmp.candidate_better);
/// ```
pub fn compare_costs(baseline: f64, candidate: f64) -> CostComparison {
    let improvement_percent = if baseline > 0.0 {
        (baseline - candidate) / baseline * 100.0
    } else {
        0.0
    };
    CostComparison {
        improvement_percent,
        baseline_better: baseline < candidate,
        candidate_better: candidate < baseline,
        equal: (baseline - candidate).abs() < 1e-3,
    }
}

/// Undirected edge usage across a set of paths.
///
/// Each traversal of `u → v` or `v → u` counts toward the key
/// `(min(u, v), max(u, v))`.
pub fn edge_usage(paths: &[Path]) -> BTreeMap<(usize, usize), usize> {
    let mut usage = BTreeMap::new();
    for (u, v) in paths.iter().flat_map(|p| p.edges()) {
        *usage.entry((u.min(v), u.max(v))).or_insert(0) += 1;
    }
    usage
}
