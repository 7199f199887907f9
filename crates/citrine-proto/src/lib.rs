// File: `crates/citrine-proto/src/lib.rs`
pub mod codec;
pub mod error;
pub mod messages;
pub mod values;

pub use codec::{decode_message, deserialize_lattice, encode_message, serialize_lattice};
pub use error::ProtoError;
pub use messages::{
    Correlated, KeyAddress, KeyAddressRequest, KeyAddressResponse, KeyRequest, KeyResponse,
    KeyTuple, RequestType, TupleError,
};
pub use values::{
    KeyVersion, LwwValue, MultiKeyCausalValue, PriorityValue, SetValue, SingleKeyCausalValue,
};
