//! Request and response messages exchanged with the routing tier and the
//! storage workers.
//!
//! All messages are serde structs encoded with the codec in this crate.
//! Responses carry the `response_id` the client correlates replies by.

use citrine_lattice::LatticeKind;
use serde::{Deserialize, Serialize};

/// Whether a `KeyRequest` reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Get,
    Put,
}

/// Per-tuple error code reported by a storage worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupleError {
    #[default]
    NoError,
    /// The key does not exist on the worker.
    KeyMissing,
    /// The request landed on a worker thread that does not own the key.
    WrongThread,
    /// The worker could not handle the payload's lattice kind.
    Lattice,
}

/// One key's slot in a request or response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTuple {
    pub key: Vec<u8>,
    /// Raw lattice kind tag; set on PUT requests and on GET responses.
    pub lattice_type: Option<u8>,
    pub payload: Vec<u8>,
    /// How many replica addresses the client has cached for this key,
    /// so the server can detect stale routing state.
    pub address_cache_size: u32,
    pub error: TupleError,
    /// Server-set signal asking the client to drop its cached replica
    /// addresses for this key.
    pub invalidate: bool,
    pub timestamp: Option<u64>,
}

impl KeyTuple {
    /// A blank tuple for a key, as placed in outgoing requests.
    pub fn for_key(key: Vec<u8>) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    /// Attach a serialized lattice payload to this tuple.
    pub fn set_payload(&mut self, payload: Vec<u8>, kind: LatticeKind) {
        self.payload = payload;
        self.lattice_type = Some(kind.tag());
    }
}

/// A read or write request addressed to one storage worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRequest {
    pub request_id: String,
    /// Where the worker should push its `KeyResponse`.
    pub response_address: String,
    pub request_type: RequestType,
    pub tuples: Vec<KeyTuple>,
}

/// A storage worker's reply to a `KeyRequest`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyResponse {
    pub response_id: String,
    pub tuples: Vec<KeyTuple>,
}

impl KeyResponse {
    pub fn new(response_id: impl Into<String>) -> Self {
        Self {
            response_id: response_id.into(),
            tuples: Vec::new(),
        }
    }
}

/// A query asking the routing tier which workers serve a set of keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAddressRequest {
    pub request_id: String,
    /// Where the routing tier should push its `KeyAddressResponse`.
    pub response_address: String,
    pub keys: Vec<Vec<u8>>,
}

/// One key's worker endpoints in a routing reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAddress {
    pub key: Vec<u8>,
    pub ips: Vec<String>,
}

/// The routing tier's reply to a `KeyAddressRequest`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAddressResponse {
    pub response_id: String,
    /// Non-zero when the routing tier could not serve the query at all.
    pub error: u32,
    pub addresses: Vec<KeyAddress>,
}

/// A reply message that can be matched back to an outstanding request.
pub trait Correlated {
    fn response_id(&self) -> &str;
}

impl Correlated for KeyResponse {
    fn response_id(&self) -> &str {
        &self.response_id
    }
}

impl Correlated for KeyAddressResponse {
    fn response_id(&self) -> &str {
        &self.response_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_message, encode_message};

    #[test]
    fn key_request_round_trips() {
        let mut tuple = KeyTuple::for_key(b"k".to_vec());
        tuple.set_payload(vec![1, 2, 3], LatticeKind::Lww);
        tuple.address_cache_size = 2;

        let req = KeyRequest {
            request_id: "10.0.0.1:42".to_owned(),
            response_address: "tcp://10.0.0.1:6460".to_owned(),
            request_type: RequestType::Put,
            tuples: vec![tuple],
        };

        let bytes = encode_message(&req).unwrap();
        let decoded: KeyRequest = decode_message(&bytes).unwrap();
        assert_eq!(decoded, req);
        assert_eq!(decoded.tuples[0].lattice_type, Some(LatticeKind::Lww.tag()));
    }

    #[test]
    fn address_response_round_trips() {
        let resp = KeyAddressResponse {
            response_id: "10.0.0.1:7".to_owned(),
            error: 0,
            addresses: vec![KeyAddress {
                key: b"k".to_vec(),
                ips: vec!["tcp://10.0.0.2:6460".to_owned()],
            }],
        };

        let bytes = encode_message(&resp).unwrap();
        let decoded: KeyAddressResponse = decode_message(&bytes).unwrap();
        assert_eq!(decoded, resp);
        assert_eq!(decoded.response_id(), "10.0.0.1:7");
    }

    #[test]
    fn default_tuple_is_clean() {
        let tuple = KeyTuple::for_key(b"k".to_vec());
        assert_eq!(tuple.error, TupleError::NoError);
        assert!(!tuple.invalidate);
        assert_eq!(tuple.lattice_type, None);
        assert_eq!(tuple.timestamp, None);
    }
}
