//! Vehicle route requests and the paths that serve them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrafficError};

/// A routing request: one vehicle travelling from `start` to `end`.
///
/// # Examples
///
/// ```
/// use u_traffic::models::VehicleRoute;
///
/// let route = VehicleRoute::new(0, 2);
/// assert!(route.validate(4).is_ok());
/// assert!(route.validate(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleRoute {
    /// Origin node.
    pub start: usize,
    /// Destination node.
    pub end: usize,
}

impl VehicleRoute {
    /// Creates a route request.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Checks that both endpoints lie in a graph of `size` nodes.
    pub fn validate(&self, size: usize) -> Result<()> {
        for node in [self.start, self.end] {
            if node >= size {
                return Err(TrafficError::NodeOutOfRange { node, size });
            }
        }
        Ok(())
    }
}

impl From<(usize, usize)> for VehicleRoute {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// Validates every route in a batch against a graph of `size` nodes.
pub fn validate_routes(routes: &[VehicleRoute], size: usize) -> Result<()> {
    routes.iter().try_for_each(|r| r.validate(size))
}

/// An ordered node sequence from a route's start to its end.
///
/// Consecutive nodes are joined by a finite edge of the weight matrix that
/// produced the path. An empty path means the destination was unreachable.
///
/// # Examples
///
/// ```
/// use u_traffic::models::Path;
///
/// let path = Path::from(vec![0, 1, 2]);
/// assert_eq!(path.start(), Some(0));
/// assert_eq!(path.end(), Some(2));
/// assert_eq!(path.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
/// assert!(Path::empty().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    /// The unreachable sentinel.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A degenerate path that stays on `node`.
    pub fn single(node: usize) -> Self {
        Self(vec![node])
    }

    /// Node sequence.
    pub fn nodes(&self) -> &[usize] {
        &self.0
    }

    /// Number of nodes (not edges).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the unreachable sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First node, if any.
    pub fn start(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// Last node, if any.
    pub fn end(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Returns `true` if this path begins at `route.start` and ends at `route.end`.
    pub fn serves(&self, route: &VehicleRoute) -> bool {
        self.start() == Some(route.start) && self.end() == Some(route.end)
    }

    /// Directed edges `(from, to)` in travel order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }

    /// Consumes the path and returns its nodes.
    pub fn into_nodes(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for Path {
    fn from(nodes: Vec<usize>) -> Self {
        Self(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_validate() {
        let r = VehicleRoute::new(1, 3);
        assert!(r.validate(4).is_ok());
        assert_eq!(
            r.validate(3),
            Err(TrafficError::NodeOutOfRange { node: 3, size: 3 })
        );
        assert_eq!(VehicleRoute::from((2, 0)), VehicleRoute::new(2, 0));
    }

    #[test]
    fn test_validate_routes_reports_first_bad() {
        let routes = vec![VehicleRoute::new(0, 1), VehicleRoute::new(9, 1)];
        assert_eq!(
            validate_routes(&routes, 5),
            Err(TrafficError::NodeOutOfRange { node: 9, size: 5 })
        );
        assert!(validate_routes(&routes[..1], 5).is_ok());
    }

    #[test]
    fn test_path_empty() {
        let p = Path::empty();
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
        assert_eq!(p.start(), None);
        assert_eq!(p.edges().count(), 0);
        assert!(!p.serves(&VehicleRoute::new(0, 0)));
    }

    #[test]
    fn test_path_single() {
        let p = Path::single(3);
        assert_eq!(p.nodes(), &[3]);
        assert_eq!(p.edges().count(), 0);
        assert!(p.serves(&VehicleRoute::new(3, 3)));
    }

    #[test]
    fn test_path_serves() {
        let p = Path::from(vec![4, 2, 7]);
        assert!(p.serves(&VehicleRoute::new(4, 7)));
        assert!(!p.serves(&VehicleRoute::new(4, 2)));
        assert_eq!(p.into_nodes(), vec![4, 2, 7]);
    }

    #[test]
    fn test_path_serializes_as_list() {
        let p = Path::from(vec![0, 1, 2]);
        assert_eq!(serde_json::to_string(&p).expect("serialize"), "[0,1,2]");
        let route: VehicleRoute =
            serde_json::from_str(r#"{"start":1,"end":2}"#).expect("deserialize");
        assert_eq!(route, VehicleRoute::new(1, 2));
    }
}
