//! The closed family of storable lattice values
//!
//! The store's wire protocol tags every payload with one of six lattice
//! kinds. [`LatticeValue`] is that family as a tagged variant, so merges
//! dispatch by exhaustive match instead of runtime class checks. Max-int,
//! map, and vector-clock lattices are interior building blocks of the
//! causal kinds and never travel as top-level values.

use crate::causal::{MultiKeyCausalLattice, SingleKeyCausalLattice};
use crate::error::LatticeError;
use crate::lattice::Lattice;
use crate::lww::LwwLattice;
use crate::ordered_set::OrderedSetLattice;
use crate::priority::PriorityLattice;
use crate::set::SetLattice;
use serde::{Deserialize, Serialize};

/// Wire discriminant for each storable lattice kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LatticeKind {
    Lww = 0,
    Set = 1,
    OrderedSet = 2,
    SingleCausal = 3,
    MultiCausal = 4,
    Priority = 5,
}

impl LatticeKind {
    /// The numeric tag carried on the wire.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look a tag back up; unknown tags yield `None`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Lww),
            1 => Some(Self::Set),
            2 => Some(Self::OrderedSet),
            3 => Some(Self::SingleCausal),
            4 => Some(Self::MultiCausal),
            5 => Some(Self::Priority),
            _ => None,
        }
    }
}

/// A lattice value of any storable kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LatticeValue {
    Lww(LwwLattice),
    Set(SetLattice),
    OrderedSet(OrderedSetLattice),
    SingleCausal(SingleKeyCausalLattice),
    MultiCausal(MultiKeyCausalLattice),
    Priority(PriorityLattice),
}

impl LatticeValue {
    pub fn kind(&self) -> LatticeKind {
        match self {
            Self::Lww(_) => LatticeKind::Lww,
            Self::Set(_) => LatticeKind::Set,
            Self::OrderedSet(_) => LatticeKind::OrderedSet,
            Self::SingleCausal(_) => LatticeKind::SingleCausal,
            Self::MultiCausal(_) => LatticeKind::MultiCausal,
            Self::Priority(_) => LatticeKind::Priority,
        }
    }

    /// Merge a value of the same kind into this one.
    ///
    /// The family is closed: merging never changes the kind, and merging
    /// across kinds is a caller bug surfaced as [`LatticeError::KindMismatch`].
    pub fn merge(&mut self, other: &LatticeValue) -> Result<(), LatticeError> {
        match (self, other) {
            (Self::Lww(a), Self::Lww(b)) => a.merge(b),
            (Self::Set(a), Self::Set(b)) => a.merge(b),
            (Self::OrderedSet(a), Self::OrderedSet(b)) => a.merge(b),
            (Self::SingleCausal(a), Self::SingleCausal(b)) => a.merge(b),
            (Self::MultiCausal(a), Self::MultiCausal(b)) => a.merge(b),
            (Self::Priority(a), Self::Priority(b)) => a.merge(b),
            (this, other) => {
                return Err(LatticeError::KindMismatch {
                    expected: this.kind(),
                    found: other.kind(),
                })
            }
        }
        Ok(())
    }

    pub fn as_lww(&self) -> Option<&LwwLattice> {
        match self {
            Self::Lww(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetLattice> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ordered_set(&self) -> Option<&OrderedSetLattice> {
        match self {
            Self::OrderedSet(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_single_causal(&self) -> Option<&SingleKeyCausalLattice> {
        match self {
            Self::SingleCausal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_multi_causal(&self) -> Option<&MultiKeyCausalLattice> {
        match self {
            Self::MultiCausal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_priority(&self) -> Option<&PriorityLattice> {
        match self {
            Self::Priority(v) => Some(v),
            _ => None,
        }
    }
}

impl From<LwwLattice> for LatticeValue {
    fn from(v: LwwLattice) -> Self {
        Self::Lww(v)
    }
}

impl From<SetLattice> for LatticeValue {
    fn from(v: SetLattice) -> Self {
        Self::Set(v)
    }
}

impl From<OrderedSetLattice> for LatticeValue {
    fn from(v: OrderedSetLattice) -> Self {
        Self::OrderedSet(v)
    }
}

impl From<SingleKeyCausalLattice> for LatticeValue {
    fn from(v: SingleKeyCausalLattice) -> Self {
        Self::SingleCausal(v)
    }
}

impl From<MultiKeyCausalLattice> for LatticeValue {
    fn from(v: MultiKeyCausalLattice) -> Self {
        Self::MultiCausal(v)
    }
}

impl From<PriorityLattice> for LatticeValue {
    fn from(v: PriorityLattice) -> Self {
        Self::Priority(v)
    }
}
