//! Map lattice - a composable container for nested lattices
//!
//! Maps keys to lattice values of one concrete kind. Merge is per-key:
//! keys present on both sides merge their values, keys present on one
//! side carry through. The operand is never mutated.

use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A key-to-lattice mapping whose merge delegates to the value lattice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLattice<K: Ord + Clone, V: Lattice> {
    entries: BTreeMap<K, V>,
}

impl<K: Ord + Clone, V: Lattice> MapLattice<K, V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a value at a key, replacing whatever was there.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Merge a single entry into the map, inserting it if absent.
    pub fn merge_entry(&mut self, key: K, value: V) {
        match self.entries.get_mut(&key) {
            Some(existing) => existing.merge(&value),
            None => {
                self.entries.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The plain map underlying this lattice.
    pub fn reveal(&self) -> &BTreeMap<K, V> {
        &self.entries
    }

    /// Replace the contents with a new map.
    pub fn assign(&mut self, entries: BTreeMap<K, V>) {
        self.entries = entries;
    }
}

impl<K: Ord + Clone, V: Lattice> Default for MapLattice<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Lattice> From<BTreeMap<K, V>> for MapLattice<K, V> {
    fn from(entries: BTreeMap<K, V>) -> Self {
        Self { entries }
    }
}

impl<K: Ord + Clone, V: Lattice> Lattice for MapLattice<K, V> {
    fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            match self.entries.get_mut(key) {
                Some(existing) => existing.merge(value),
                None => {
                    self.entries.insert(key.clone(), value.clone());
                }
            }
        }
    }
}
