//! Vector clocks - per-node monotone counters with a partial order
//!
//! Internally a map from node id to [`MaxIntLattice`]; on the wire a plain
//! node-to-integer map. `to_counts`/`from_counts` are the only crossing
//! points between the two representations.

use crate::lattice::Lattice;
use crate::map::MapLattice;
use crate::max_int::MaxIntLattice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of comparing two vector clocks component-wise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Causality {
    Equal,
    /// Every component is ≥ the other's, at least one strictly greater.
    Dominates,
    DominatedBy,
    Concurrent,
}

/// A map from node id to a monotonically non-decreasing counter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorClock {
    clock: MapLattice<String, MaxIntLattice>,
}

impl VectorClock {
    pub fn new() -> Self {
        Self {
            clock: MapLattice::new(),
        }
    }

    /// Build a clock from raw wire counters.
    pub fn from_counts(counts: BTreeMap<String, u64>) -> Self {
        let mut clock = MapLattice::new();
        for (node, count) in counts {
            clock.insert(node, MaxIntLattice::new(count));
        }
        Self { clock }
    }

    /// Project the clock back to raw wire counters.
    pub fn to_counts(&self) -> BTreeMap<String, u64> {
        self.clock
            .iter()
            .map(|(node, count)| (node.clone(), count.reveal()))
            .collect()
    }

    /// Merge a single node's counter into the clock, inserting if absent.
    pub fn update(&mut self, node: impl Into<String>, count: u64) {
        self.clock.merge_entry(node.into(), MaxIntLattice::new(count));
    }

    /// The counter for a node; nodes never seen read as 0.
    pub fn get(&self, node: &str) -> u64 {
        self.clock
            .get(&node.to_owned())
            .map(MaxIntLattice::reveal)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.clock.is_empty()
    }

    /// The underlying node-to-counter lattice map.
    pub fn reveal(&self) -> &BTreeMap<String, MaxIntLattice> {
        self.clock.reveal()
    }

    /// Replace the contents with a new node-to-counter map.
    pub fn assign(&mut self, entries: BTreeMap<String, MaxIntLattice>) {
        self.clock.assign(entries);
    }

    /// Compare two clocks component-wise, missing components reading as 0.
    pub fn causality(&self, other: &Self) -> Causality {
        let mut some_greater = false;
        let mut some_less = false;

        for node in self.clock.keys().chain(other.clock.keys()) {
            let ours = self.get(node);
            let theirs = other.get(node);
            if ours > theirs {
                some_greater = true;
            } else if ours < theirs {
                some_less = true;
            }
        }

        match (some_greater, some_less) {
            (false, false) => Causality::Equal,
            (true, false) => Causality::Dominates,
            (false, true) => Causality::DominatedBy,
            (true, true) => Causality::Concurrent,
        }
    }

    /// True iff `self` strictly dominates `other`.
    pub fn dominates(&self, other: &Self) -> bool {
        self.causality(other) == Causality::Dominates
    }
}

impl Lattice for VectorClock {
    fn merge(&mut self, other: &Self) {
        self.clock.merge(&other.clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vc(counts: &[(&str, u64)]) -> VectorClock {
        VectorClock::from_counts(
            counts
                .iter()
                .map(|(n, c)| ((*n).to_owned(), *c))
                .collect(),
        )
    }

    #[test]
    fn domination_cases() {
        let a = vc(&[("A", 2), ("B", 1)]);
        let b = vc(&[("A", 1), ("B", 1)]);
        assert_eq!(a.causality(&b), Causality::Dominates);
        assert_eq!(b.causality(&a), Causality::DominatedBy);
        assert!(a.dominates(&b));

        let c = vc(&[("A", 1)]);
        let d = vc(&[("B", 1)]);
        assert_eq!(c.causality(&d), Causality::Concurrent);
        assert_eq!(c.causality(&c.clone()), Causality::Equal);
    }

    #[test]
    fn missing_components_read_as_zero() {
        let a = vc(&[("A", 1), ("B", 1)]);
        let b = vc(&[("A", 1)]);
        assert_eq!(a.causality(&b), Causality::Dominates);
        assert_eq!(b.get("B"), 0);
    }

    #[test]
    fn merge_is_component_wise_max() {
        let mut a = vc(&[("A", 3), ("B", 1)]);
        a.merge(&vc(&[("A", 1), ("B", 5), ("C", 2)]));
        assert_eq!(a, vc(&[("A", 3), ("B", 5), ("C", 2)]));
    }

    #[test]
    fn update_merges_one_entry() {
        let mut a = vc(&[("A", 3)]);
        a.update("A", 1);
        assert_eq!(a.get("A"), 3);
        a.update("A", 7);
        assert_eq!(a.get("A"), 7);
        a.update("B", 2);
        assert_eq!(a.get("B"), 2);
    }

    #[test]
    fn counts_round_trip() {
        let a = vc(&[("A", 4), ("B", 9)]);
        assert_eq!(VectorClock::from_counts(a.to_counts()), a);
    }
}
