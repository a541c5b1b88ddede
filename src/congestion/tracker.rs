//! Directed per-edge usage counts.

use crate::models::Path;

/// Number of current paths traversing each directed edge.
///
/// Counts never go below zero: removing a path that was never added leaves
/// the affected entries at zero. A matched [`add_path`](Self::add_path) /
/// [`remove_path`](Self::remove_path) pair restores the previous state
/// exactly.
///
/// # Examples
///
/// ```
/// use u_traffic::congestion::CongestionMatrix;
/// use u_traffic::models::Path;
///
/// let paths = vec![Path::from(vec![0, 1, 2]), Path::from(vec![0, 1])];
/// let mut cm = CongestionMatrix::build(3, &paths);
/// assert_eq!(cm.get(0, 1), 2);
/// assert_eq!(cm.get(1, 2), 1);
///
/// cm.remove_path(&paths[0]);
/// assert_eq!(cm.get(0, 1), 1);
/// assert_eq!(cm.get(1, 2), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CongestionMatrix {
    counts: Vec<u32>,
    size: usize,
}

impl CongestionMatrix {
    /// Creates an all-zero matrix for `size` nodes.
    pub fn new(size: usize) -> Self {
        Self {
            counts: vec![0; size * size],
            size,
        }
    }

    /// Rebuilds usage counts from scratch for a set of paths.
    pub fn build(size: usize, paths: &[Path]) -> Self {
        let mut cm = Self::new(size);
        for path in paths {
            cm.add_path(path);
        }
        cm
    }

    /// Adds `delta` to every edge along `path`, clamping at zero.
    ///
    /// Edges traversed twice by the same path receive `delta` twice.
    pub fn update(&mut self, path: &Path, delta: i32) {
        for (from, to) in path.edges() {
            let slot = &mut self.counts[from * self.size + to];
            *slot = if delta >= 0 {
                slot.saturating_add(delta.unsigned_abs())
            } else {
                slot.saturating_sub(delta.unsigned_abs())
            };
        }
    }

    /// Records one more vehicle on every edge of `path`.
    pub fn add_path(&mut self, path: &Path) {
        self.update(path, 1);
    }

    /// Removes one vehicle from every edge of `path`.
    pub fn remove_path(&mut self, path: &Path) {
        self.update(path, -1);
    }

    /// Usage count of the directed edge `from → to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> u32 {
        self.counts[from * self.size + to]
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum of all edge counts (total edge traversals).
    pub fn total_usage(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Highest count on any single edge.
    pub fn max_usage(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Edges with non-zero usage as `(from, to, count)`, in row-major order.
    pub fn used_edges(&self) -> Vec<(usize, usize, u32)> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(idx, &c)| (idx / self.size, idx % self.size, c))
            .collect()
    }
}
