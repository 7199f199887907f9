//! Last-writer-wins pair lattice
//!
//! A timestamp-tagged byte value. Merge keeps the operand with the larger
//! timestamp; equal timestamps fall back to the lexicographically larger
//! value bytes so that merge stays a total, commutative maximum.

use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};

/// A (timestamp, bytes) pair ordered by timestamp, then value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LwwLattice {
    timestamp: u64,
    value: Vec<u8>,
}

impl LwwLattice {
    pub fn new(timestamp: u64, value: Vec<u8>) -> Self {
        Self { timestamp, value }
    }

    /// The plain value stored by this lattice.
    pub fn reveal(&self) -> &[u8] {
        &self.value
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Replace the contents with a new timestamp-bytes pair.
    pub fn assign(&mut self, timestamp: u64, value: Vec<u8>) {
        self.timestamp = timestamp;
        self.value = value;
    }
}

impl Lattice for LwwLattice {
    fn merge(&mut self, other: &Self) {
        if (other.timestamp, &other.value) > (self.timestamp, &self.value) {
            self.timestamp = other.timestamp;
            self.value = other.value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn larger_timestamp_wins() {
        let mut a = LwwLattice::new(7, b"old".to_vec());
        let b = LwwLattice::new(12, b"new".to_vec());

        a.merge(&b);
        assert_eq!(a.timestamp(), 12);
        assert_eq!(a.reveal(), b"new");

        // Stale writes do not regress the value.
        a.merge(&LwwLattice::new(3, b"stale".to_vec()));
        assert_eq!(a.reveal(), b"new");
    }

    #[test]
    fn equal_timestamps_are_deterministic() {
        let mut a = LwwLattice::new(5, b"apple".to_vec());
        let mut b = LwwLattice::new(5, b"zebra".to_vec());

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert_eq!(ab, ba);
        assert_eq!(ab.reveal(), b"zebra");

        a.merge(&b.clone());
        b.merge(&LwwLattice::new(5, b"apple".to_vec()));
        assert_eq!(a, b);
    }

    #[test]
    fn assign_replaces_contents() {
        let mut a = LwwLattice::new(1, b"x".to_vec());
        a.assign(9, b"y".to_vec());
        assert_eq!(a.timestamp(), 9);
        assert_eq!(a.reveal(), b"y");
    }

    fn arb_lww() -> impl Strategy<Value = LwwLattice> {
        (0u64..50, prop::collection::vec(any::<u8>(), 0..8))
            .prop_map(|(ts, v)| LwwLattice::new(ts, v))
    }

    proptest! {
        #[test]
        fn lww_merge_is_commutative(a in arb_lww(), b in arb_lww()) {
            prop_assert_eq!(a.join(&b), b.join(&a));
        }

        #[test]
        fn lww_merge_is_associative(a in arb_lww(), b in arb_lww(), c in arb_lww()) {
            prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        }

        #[test]
        fn lww_merge_is_idempotent(a in arb_lww()) {
            prop_assert_eq!(a.join(&a), a);
        }
    }
}
