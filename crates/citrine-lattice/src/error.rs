//! Error types for the lattice algebra.

use crate::value::LatticeKind;
use thiserror::Error;

/// Error type for lattice construction and merging.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// Merge was attempted across two different concrete kinds.
    #[error("cannot merge a {found:?} lattice into a {expected:?} lattice")]
    KindMismatch {
        expected: LatticeKind,
        found: LatticeKind,
    },
    /// A constructor or `assign` rejected its argument.
    #[error("invalid lattice contents: {0}")]
    InvalidValue(String),
}
