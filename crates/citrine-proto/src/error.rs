//! Error types for the wire codec.

use thiserror::Error;

/// Error type for encoding and decoding wire payloads.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A payload arrived tagged with a lattice kind this client does not know.
    #[error("unsupported lattice kind tag {0}")]
    UnsupportedLatticeKind(u8),
    /// A value or message failed to encode.
    #[error("failed to encode wire payload: {0}")]
    Encode(#[source] bincode::Error),
    /// A payload or message failed to decode.
    #[error("failed to decode wire payload: {0}")]
    Decode(#[source] bincode::Error),
}
