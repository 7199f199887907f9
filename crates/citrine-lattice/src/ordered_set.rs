//! Ordered set lattice
//!
//! An ascending-sorted, duplicate-free sequence of byte strings backed by a
//! plain vector. A vector is far cheaper to deserialize into than a tree,
//! at the cost of expensive random insertion - which is rare here, since
//! writers almost always append at the tail.

use crate::error::LatticeError;
use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};

/// A sorted, unique sequence of byte strings with union-by-lockstep merge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedSetLattice {
    items: Vec<Vec<u8>>,
}

impl OrderedSetLattice {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build from a sequence that is already strictly ascending.
    pub fn from_sorted(items: Vec<Vec<u8>>) -> Result<Self, LatticeError> {
        if items.windows(2).any(|w| w[0] >= w[1]) {
            return Err(LatticeError::InvalidValue(
                "ordered set input must be strictly ascending".to_owned(),
            ));
        }
        Ok(Self { items })
    }

    /// Insert a value, maintaining sorted order. Duplicates are no-ops.
    pub fn insert(&mut self, value: Vec<u8>) {
        // Fast path: appends at or past the tail.
        let append = match self.items.last() {
            None => true,
            Some(last) => value > *last,
        };

        if append {
            self.items.push(value);
        } else if let Err(idx) = self.items.binary_search(&value) {
            self.items.insert(idx, value);
        }
    }

    pub fn contains(&self, value: &[u8]) -> bool {
        self.items.binary_search_by(|item| item.as_slice().cmp(value)).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<u8>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The plain sorted sequence underlying this lattice.
    pub fn reveal(&self) -> &[Vec<u8>] {
        &self.items
    }

    /// Replace the contents with a new strictly ascending sequence.
    pub fn assign(&mut self, items: Vec<Vec<u8>>) -> Result<(), LatticeError> {
        *self = Self::from_sorted(items)?;
        Ok(())
    }
}

impl FromIterator<Vec<u8>> for OrderedSetLattice {
    fn from_iter<I: IntoIterator<Item = Vec<u8>>>(iter: I) -> Self {
        let mut out = Self::new();
        for value in iter {
            out.insert(value);
        }
        out
    }
}

impl Lattice for OrderedSetLattice {
    /// Lockstep merge of two sorted sequences; equal elements collapse.
    /// Reconstruction is faster than repeated in-place insertion.
    fn merge(&mut self, other: &Self) {
        let mut merged = Vec::with_capacity(self.items.len() + other.items.len());
        let (us, them) = (&self.items, &other.items);
        let (mut i, mut j) = (0, 0);

        while i < us.len() && j < them.len() {
            match us[i].cmp(&them[j]) {
                std::cmp::Ordering::Equal => {
                    merged.push(us[i].clone());
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Less => {
                    merged.push(us[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(them[j].clone());
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&us[i..]);
        merged.extend_from_slice(&them[j..]);

        self.items = merged;
    }
}
