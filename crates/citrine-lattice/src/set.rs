//! Unordered set lattice - merge is set union

use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A grow-by-union set of byte strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLattice {
    elements: BTreeSet<Vec<u8>>,
}

impl SetLattice {
    pub fn new() -> Self {
        Self {
            elements: BTreeSet::new(),
        }
    }

    pub fn insert(&mut self, value: Vec<u8>) {
        self.elements.insert(value);
    }

    pub fn contains(&self, value: &[u8]) -> bool {
        self.elements.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<u8>> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The plain set underlying this lattice.
    pub fn reveal(&self) -> &BTreeSet<Vec<u8>> {
        &self.elements
    }

    /// Replace the contents with a new set.
    pub fn assign(&mut self, elements: BTreeSet<Vec<u8>>) {
        self.elements = elements;
    }
}

impl From<BTreeSet<Vec<u8>>> for SetLattice {
    fn from(elements: BTreeSet<Vec<u8>>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Vec<u8>> for SetLattice {
    fn from_iter<I: IntoIterator<Item = Vec<u8>>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Lattice for SetLattice {
    fn merge(&mut self, other: &Self) {
        for v in &other.elements {
            if !self.elements.contains(v) {
                self.elements.insert(v.clone());
            }
        }
    }
}
