//! Binary decision variables and their dense index assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// "Vehicle `vehicle` is at node `node` at time step `step`."
///
/// Field order gives the natural `Ord`: by vehicle, then step, then node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableKey {
    /// Vehicle (route) index in the full batch.
    pub vehicle: usize,
    /// Time step, `0..=horizon`.
    pub step: usize,
    /// Graph node.
    pub node: usize,
}

impl VariableKey {
    /// Creates a key.
    pub fn new(vehicle: usize, step: usize, node: usize) -> Self {
        Self {
            vehicle,
            step,
            node,
        }
    }
}

/// Arena of variable keys, each assigned the next sequential index on
/// insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableIndex {
    keys: Vec<VariableKey>,
    lookup: HashMap<VariableKey, usize>,
}

impl VariableIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` and returns its index.
    ///
    /// Re-inserting an existing key returns the index it already has.
    pub fn push(&mut self, key: VariableKey) -> usize {
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }
        let index = self.keys.len();
        self.keys.push(key);
        self.lookup.insert(key, index);
        index
    }

    /// Index of `key`, if it was enumerated.
    pub fn get(&self, key: &VariableKey) -> Option<usize> {
        self.lookup.get(key).copied()
    }

    /// Key at `index`.
    pub fn key(&self, index: usize) -> Option<VariableKey> {
        self.keys.get(index).copied()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no variables were enumerated.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(index, key)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, VariableKey)> + '_ {
        self.keys.iter().copied().enumerate()
    }
}
