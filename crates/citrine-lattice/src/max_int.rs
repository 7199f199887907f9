//! Max-integer lattice - merge takes the numeric maximum

use crate::lattice::Lattice;
use serde::{Deserialize, Serialize};

/// A monotonically non-decreasing counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaxIntLattice {
    value: u64,
}

impl MaxIntLattice {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    /// The plain integer underlying this lattice.
    pub fn reveal(&self) -> u64 {
        self.value
    }

    pub fn assign(&mut self, value: u64) {
        self.value = value;
    }
}

impl Lattice for MaxIntLattice {
    fn merge(&mut self, other: &Self) {
        if other.value > self.value {
            self.value = other.value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn merge_takes_maximum() {
        let mut a = MaxIntLattice::new(4);
        a.merge(&MaxIntLattice::new(9));
        assert_eq!(a.reveal(), 9);

        a.merge(&MaxIntLattice::new(2));
        assert_eq!(a.reveal(), 9);
    }

    proptest! {
        #[test]
        fn max_int_merge_is_commutative(a in any::<u64>(), b in any::<u64>()) {
            let (a, b) = (MaxIntLattice::new(a), MaxIntLattice::new(b));
            prop_assert_eq!(a.join(&b), b.join(&a));
        }

        #[test]
        fn max_int_merge_is_associative(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
            let (a, b, c) = (MaxIntLattice::new(a), MaxIntLattice::new(b), MaxIntLattice::new(c));
            prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        }

        #[test]
        fn max_int_merge_is_idempotent(a in any::<u64>()) {
            let a = MaxIntLattice::new(a);
            prop_assert_eq!(a.join(&a), a);
        }
    }
}
