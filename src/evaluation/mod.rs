//! Path cost evaluation, route validation, and usage statistics.

mod evaluator;

pub use evaluator::{
    compare_costs, edge_usage, path_cost, total_cost, validate_paths, CostComparison, IssueKind,
    PathIssue, RouteValidation,
};
