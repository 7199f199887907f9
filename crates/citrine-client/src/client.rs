//! The client facade: `get`, `get_all`, `put`, `put_all`.
//!
//! All operations are synchronous: requests are pushed to workers, then
//! the call blocks on the response puller until every recorded request id
//! has a reply or the deadline passes. Worker endpoints come from the
//! routing tier via the per-key address cache; a worker can ask the
//! client to drop a cached entry by setting the `invalidate` flag on a
//! response tuple.
//!
//! A client instance owns its pullers and counters and performs no
//! internal locking; callers sharing one across threads must serialize
//! access themselves.

use crate::config::ClientConfig;
use crate::correlator::{collect_responses, RequestIdSource};
use crate::error::ClientError;
use crate::identity::{routing_ports, ClientThread};
use crate::routing::AddressCache;
use crate::transport::{PushSocket, SocketCache, Transport};
use citrine_lattice::LatticeValue;
use citrine_proto::{
    deserialize_lattice, encode_message, serialize_lattice, KeyAddressRequest, KeyAddressResponse,
    KeyRequest, KeyResponse, KeyTuple, RequestType, TupleError,
};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One or many keys; scalars promote to a one-element batch.
#[derive(Clone, Debug)]
pub struct KeyBatch(Vec<Vec<u8>>);

impl KeyBatch {
    pub fn into_keys(self) -> Vec<Vec<u8>> {
        self.0
    }
}

impl From<Vec<u8>> for KeyBatch {
    fn from(key: Vec<u8>) -> Self {
        Self(vec![key])
    }
}

impl From<&[u8]> for KeyBatch {
    fn from(key: &[u8]) -> Self {
        Self(vec![key.to_vec()])
    }
}

impl From<&str> for KeyBatch {
    fn from(key: &str) -> Self {
        Self(vec![key.as_bytes().to_vec()])
    }
}

impl From<String> for KeyBatch {
    fn from(key: String) -> Self {
        Self(vec![key.into_bytes()])
    }
}

impl From<Vec<Vec<u8>>> for KeyBatch {
    fn from(keys: Vec<Vec<u8>>) -> Self {
        Self(keys)
    }
}

impl From<&[Vec<u8>]> for KeyBatch {
    fn from(keys: &[Vec<u8>]) -> Self {
        Self(keys.to_vec())
    }
}

impl From<Vec<&str>> for KeyBatch {
    fn from(keys: Vec<&str>) -> Self {
        Self(keys.into_iter().map(|k| k.as_bytes().to_vec()).collect())
    }
}

/// Result of a read: every requested key, `None` where no replica
/// answered cleanly.
pub type GetResult = BTreeMap<Vec<u8>, Option<LatticeValue>>;

/// A blocking Citrine KVS client over a push/pull transport.
pub struct Client<T: Transport> {
    config: ClientConfig,
    thread: ClientThread,
    routing_ports: Vec<u16>,
    pushers: SocketCache<T>,
    response_puller: T::Pull,
    address_puller: T::Pull,
    addresses: AddressCache,
    ids: RequestIdSource,
}

impl<T: Transport> Client<T> {
    /// Bind the client's reply endpoints and set up its caches.
    pub fn new(transport: T, config: ClientConfig) -> Result<Self, ClientError> {
        let thread = ClientThread::new(config.ip.clone(), config.thread_offset);
        let response_puller = transport.bind_pull(&thread.request_pull_bind_addr())?;
        let address_puller = transport.bind_pull(&thread.key_address_bind_addr())?;
        let ids = RequestIdSource::new(config.ip.clone(), config.request_id_modulus);

        Ok(Self {
            routing_ports: routing_ports(config.local),
            pushers: SocketCache::new(transport),
            thread,
            response_puller,
            address_puller,
            addresses: AddressCache::new(),
            ids,
            config,
        })
    }

    /// The connect-form address workers push responses to.
    pub fn response_address(&self) -> String {
        self.thread.request_pull_connect_addr()
    }

    /// Read each key from one replica.
    ///
    /// Keys with no addressable worker, or whose reply carried an error,
    /// map to `None`.
    pub fn get(&mut self, keys: impl Into<KeyBatch>) -> Result<GetResult, ClientError> {
        let keys = keys.into().into_keys();
        let mut result: GetResult = keys.iter().map(|k| (k.clone(), None)).collect();

        let mut request_ids = Vec::new();
        for key in &keys {
            let Some(address) = self.pick_worker(key)? else {
                continue;
            };
            let request = self.prepare_key_request(std::slice::from_ref(key), RequestType::Get);
            self.send_to(&address, &request)?;
            request_ids.push(request.request_id);
        }

        for response in self.await_key_responses(&request_ids)? {
            for tuple in response.tuples {
                self.note_invalidation(&tuple);
                if let Some(value) = decode_tuple(&tuple)? {
                    if let Some(slot) = result.get_mut(&tuple.key) {
                        *slot = Some(value);
                    }
                }
            }
        }

        Ok(result)
    }

    /// Read each key from every cached replica and merge the versions.
    ///
    /// A key's value is `None` only if no replica responded without an
    /// error; otherwise it is the lattice merge of every clean reply.
    pub fn get_all(&mut self, keys: impl Into<KeyBatch>) -> Result<GetResult, ClientError> {
        let keys = keys.into().into_keys();
        let mut result: GetResult = keys.iter().map(|k| (k.clone(), None)).collect();

        let mut request_ids = Vec::new();
        for key in &keys {
            for address in self.worker_addresses(key)? {
                let request =
                    self.prepare_key_request(std::slice::from_ref(key), RequestType::Get);
                self.send_to(&address, &request)?;
                request_ids.push(request.request_id);
            }
        }

        for response in self.await_key_responses(&request_ids)? {
            for tuple in response.tuples {
                self.note_invalidation(&tuple);
                if let Some(value) = decode_tuple(&tuple)? {
                    match result.get_mut(&tuple.key) {
                        Some(Some(merged)) => merged.merge(&value)?,
                        Some(slot) => *slot = Some(value),
                        None => {}
                    }
                }
            }
        }

        Ok(result)
    }

    /// Write a value to one replica of a key.
    ///
    /// Returns `false` when the key is unaddressable or the worker
    /// reported an error.
    pub fn put(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: &LatticeValue,
    ) -> Result<bool, ClientError> {
        let key = key.into();
        let Some(address) = self.pick_worker(&key)? else {
            return Ok(false);
        };

        let (payload, kind) = serialize_lattice(value)?;
        let mut request = self.prepare_key_request(std::slice::from_ref(&key), RequestType::Put);
        request.tuples[0].set_payload(payload, kind);
        self.send_to(&address, &request)?;

        let responses = self.await_key_responses(std::slice::from_ref(&request.request_id))?;
        let Some(tuple) = responses.into_iter().next().and_then(|r| r.tuples.into_iter().next())
        else {
            warn!("put response carried no tuple");
            return Ok(false);
        };

        self.note_invalidation(&tuple);
        Ok(tuple.error == TupleError::NoError)
    }

    /// Write a value to every replica of a key and wait for all of them.
    ///
    /// A cache invalidation during the round drops the entry and re-issues
    /// the whole operation once against fresh addresses. Returns `false`
    /// if the key is unaddressable or any replica reported an error.
    pub fn put_all(
        &mut self,
        key: impl Into<Vec<u8>>,
        value: &LatticeValue,
    ) -> Result<bool, ClientError> {
        self.put_all_inner(key.into(), value, true)
    }

    fn put_all_inner(
        &mut self,
        key: Vec<u8>,
        value: &LatticeValue,
        may_reissue: bool,
    ) -> Result<bool, ClientError> {
        let replicas = self.worker_addresses(&key)?;
        if replicas.is_empty() {
            return Ok(false);
        }

        let (payload, kind) = serialize_lattice(value)?;
        let mut request_ids = Vec::with_capacity(replicas.len());
        for address in &replicas {
            let mut request =
                self.prepare_key_request(std::slice::from_ref(&key), RequestType::Put);
            request.tuples[0].set_payload(payload.clone(), kind);
            request.tuples[0].timestamp = Some(0);
            self.send_to(address, &request)?;
            request_ids.push(request.request_id);
        }

        let mut all_acked = true;
        for response in self.await_key_responses(&request_ids)? {
            let Some(tuple) = response.tuples.first() else {
                all_acked = false;
                continue;
            };

            if tuple.invalidate {
                self.addresses.invalidate(&tuple.key);
                if may_reissue {
                    debug!(
                        key = %String::from_utf8_lossy(&key),
                        "routing went stale mid-write, re-issuing against fresh replicas"
                    );
                    return self.put_all_inner(key, value, false);
                }
            }

            if tuple.error != TupleError::NoError {
                warn!(
                    key = %String::from_utf8_lossy(&tuple.key),
                    error = ?tuple.error,
                    "replica rejected write"
                );
                all_acked = false;
            }
        }

        Ok(all_acked)
    }

    /// One uniformly chosen worker for a key, `None` if unaddressable.
    fn pick_worker(&mut self, key: &[u8]) -> Result<Option<String>, ClientError> {
        let addresses = self.worker_addresses(key)?;
        if addresses.is_empty() {
            return Ok(None);
        }
        let chosen = rand::thread_rng().gen_range(0..addresses.len());
        Ok(addresses.into_iter().nth(chosen))
    }

    /// All cached workers for a key, querying the routing tier on a miss.
    fn worker_addresses(&mut self, key: &[u8]) -> Result<Vec<String>, ClientError> {
        if self.addresses.cached(key).is_none() {
            let port = self.routing_ports[rand::thread_rng().gen_range(0..self.routing_ports.len())];
            let addresses = self.query_routing(key, port)?;
            self.addresses.insert(key.to_vec(), addresses);
        }
        Ok(self
            .addresses
            .cached(key)
            .map(<[String]>::to_vec)
            .unwrap_or_default())
    }

    /// Synchronously ask the routing tier which workers serve a key.
    fn query_routing(&mut self, key: &[u8], port: u16) -> Result<Vec<String>, ClientError> {
        let request = KeyAddressRequest {
            request_id: self.ids.next(),
            response_address: self.thread.key_address_connect_addr(),
            keys: vec![key.to_vec()],
        };

        let destination = format!("tcp://{}:{}", self.config.routing_address, port);
        debug!(
            key = %String::from_utf8_lossy(key),
            %destination,
            "querying routing tier"
        );
        self.send_to(&destination, &request)?;

        let responses: Vec<KeyAddressResponse> = collect_responses(
            std::slice::from_ref(&request.request_id),
            &mut self.address_puller,
            self.config.request_timeout,
        )?;

        let Some(response) = responses.into_iter().next() else {
            return Ok(Vec::new());
        };
        if response.error != 0 {
            warn!(error = response.error, "routing tier rejected address query");
            return Ok(Vec::new());
        }

        Ok(response
            .addresses
            .into_iter()
            .filter(|address| address.key == key)
            .flat_map(|address| address.ips)
            .collect())
    }

    /// A fresh `KeyRequest` with one blank tuple per key, stamped with
    /// this client's reply address, a new request id, and the cached
    /// replica count per key.
    fn prepare_key_request(&mut self, keys: &[Vec<u8>], request_type: RequestType) -> KeyRequest {
        let tuples = keys
            .iter()
            .map(|key| {
                let mut tuple = KeyTuple::for_key(key.clone());
                if let Some(cached) = self.addresses.cached_len(key) {
                    tuple.address_cache_size = cached as u32;
                }
                tuple
            })
            .collect();

        KeyRequest {
            request_id: self.ids.next(),
            response_address: self.response_address(),
            request_type,
            tuples,
        }
    }

    fn await_key_responses(
        &mut self,
        request_ids: &[String],
    ) -> Result<Vec<KeyResponse>, ClientError> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        collect_responses(
            request_ids,
            &mut self.response_puller,
            self.config.request_timeout,
        )
    }

    fn send_to<M: Serialize>(&mut self, address: &str, message: &M) -> Result<(), ClientError> {
        let frame = encode_message(message)?;
        debug!(address, bytes = frame.len(), "pushing request");
        self.pushers.get(address)?.send(&frame)?;
        Ok(())
    }

    fn note_invalidation(&mut self, tuple: &KeyTuple) {
        if tuple.invalidate {
            self.addresses.invalidate(&tuple.key);
        }
    }
}

/// The decoded value of a clean tuple; `None` for errored tuples.
fn decode_tuple(tuple: &KeyTuple) -> Result<Option<LatticeValue>, ClientError> {
    if tuple.error != TupleError::NoError {
        return Ok(None);
    }
    let Some(tag) = tuple.lattice_type else {
        warn!(
            key = %String::from_utf8_lossy(&tuple.key),
            "clean tuple arrived without a lattice kind"
        );
        return Ok(None);
    };
    Ok(Some(deserialize_lattice(&tuple.payload, tag)?))
}
