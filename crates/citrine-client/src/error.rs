//! Error types for the client facade.

use crate::transport::TransportError;
use citrine_lattice::LatticeError;
use citrine_proto::ProtoError;
use std::time::Duration;
use thiserror::Error;

/// Error type for client operations.
///
/// Per-key server outcomes are not errors: an unaddressable or errored key
/// reads back as `None` and writes report `false`. This type covers the
/// failures that sink the whole call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No reply arrived within the configured window.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The transport failed outright.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    /// A payload could not be encoded or decoded.
    #[error(transparent)]
    Proto(#[from] ProtoError),
    /// A lattice operation was misused, e.g. a cross-kind merge.
    #[error(transparent)]
    Lattice(#[from] LatticeError),
}
