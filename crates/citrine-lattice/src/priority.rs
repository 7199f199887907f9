//! Priority pair lattice
//!
//! A (priority, bytes) pair where the numerically smaller priority wins;
//! equal priorities fall back to the lexicographically smaller value so
//! that merge stays a total, commutative minimum.

use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};

/// A (priority, bytes) pair ordered by priority ascending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityLattice {
    priority: u64,
    value: Vec<u8>,
}

impl PriorityLattice {
    pub fn new(priority: u64, value: Vec<u8>) -> Self {
        Self { priority, value }
    }

    /// The plain value stored by this lattice.
    pub fn reveal(&self) -> &[u8] {
        &self.value
    }

    pub fn priority(&self) -> u64 {
        self.priority
    }

    /// Replace the contents with a new priority-bytes pair.
    pub fn assign(&mut self, priority: u64, value: Vec<u8>) {
        self.priority = priority;
        self.value = value;
    }
}

impl Lattice for PriorityLattice {
    fn merge(&mut self, other: &Self) {
        if (other.priority, &other.value) < (self.priority, &self.value) {
            self.priority = other.priority;
            self.value = other.value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lower_priority_wins() {
        let mut a = PriorityLattice::new(10, b"background".to_vec());
        a.merge(&PriorityLattice::new(1, b"urgent".to_vec()));
        assert_eq!(a.priority(), 1);
        assert_eq!(a.reveal(), b"urgent");

        a.merge(&PriorityLattice::new(5, b"routine".to_vec()));
        assert_eq!(a.reveal(), b"urgent");
    }

    fn arb_priority() -> impl Strategy<Value = PriorityLattice> {
        (0u64..50, prop::collection::vec(any::<u8>(), 0..8))
            .prop_map(|(p, v)| PriorityLattice::new(p, v))
    }

    proptest! {
        #[test]
        fn priority_merge_is_commutative(a in arb_priority(), b in arb_priority()) {
            prop_assert_eq!(a.join(&b), b.join(&a));
        }

        #[test]
        fn priority_merge_is_associative(
            a in arb_priority(),
            b in arb_priority(),
            c in arb_priority()
        ) {
            prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        }

        #[test]
        fn priority_merge_is_idempotent(a in arb_priority()) {
            prop_assert_eq!(a.join(&a), a);
        }
    }
}
