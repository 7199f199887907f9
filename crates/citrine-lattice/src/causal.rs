//! Causally versioned lattices
//!
//! A value set tagged with a vector clock. Merge compares the clocks:
//! the dominated side is discarded wholesale; concurrent versions keep
//! the joined clock and the union of both value sets.

use crate::lattice::Lattice;
use crate::map::MapLattice;
use crate::set::SetLattice;
use crate::vector_clock::{Causality, VectorClock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single-key causal value: (vector clock, value set).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleKeyCausalLattice {
    vector_clock: VectorClock,
    value: SetLattice,
}

impl SingleKeyCausalLattice {
    pub fn new(vector_clock: VectorClock, value: SetLattice) -> Self {
        Self {
            vector_clock,
            value,
        }
    }

    pub fn vector_clock(&self) -> &VectorClock {
        &self.vector_clock
    }

    /// The plain value set underlying this lattice.
    pub fn reveal(&self) -> &BTreeSet<Vec<u8>> {
        self.value.reveal()
    }

    /// Replace the value set, leaving the clock untouched.
    pub fn assign(&mut self, value: SetLattice) {
        self.value = value;
    }
}

impl Lattice for SingleKeyCausalLattice {
    fn merge(&mut self, other: &Self) {
        match self.vector_clock.causality(&other.vector_clock) {
            Causality::Dominates => {}
            Causality::DominatedBy => *self = other.clone(),
            Causality::Equal | Causality::Concurrent => {
                self.vector_clock.merge(&other.vector_clock);
                self.value.merge(&other.value);
            }
        }
    }
}

/// A multi-key causal value: adds the vector clocks of the KVS keys this
/// write depended on, merged component-wise alongside the value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiKeyCausalLattice {
    vector_clock: VectorClock,
    dependencies: MapLattice<Vec<u8>, VectorClock>,
    value: SetLattice,
}

impl MultiKeyCausalLattice {
    pub fn new(
        vector_clock: VectorClock,
        dependencies: MapLattice<Vec<u8>, VectorClock>,
        value: SetLattice,
    ) -> Self {
        Self {
            vector_clock,
            dependencies,
            value,
        }
    }

    pub fn vector_clock(&self) -> &VectorClock {
        &self.vector_clock
    }

    pub fn dependencies(&self) -> &MapLattice<Vec<u8>, VectorClock> {
        &self.dependencies
    }

    /// The plain value set underlying this lattice.
    pub fn reveal(&self) -> &BTreeSet<Vec<u8>> {
        self.value.reveal()
    }

    /// Replace the value set, leaving clock and dependencies untouched.
    pub fn assign(&mut self, value: SetLattice) {
        self.value = value;
    }
}

impl Lattice for MultiKeyCausalLattice {
    fn merge(&mut self, other: &Self) {
        match self.vector_clock.causality(&other.vector_clock) {
            Causality::Dominates => {}
            Causality::DominatedBy => *self = other.clone(),
            Causality::Equal | Causality::Concurrent => {
                self.vector_clock.merge(&other.vector_clock);
                self.dependencies.merge(&other.dependencies);
                self.value.merge(&other.value);
            }
        }
    }
}
