//! Per-key replica address cache.
//!
//! Maps a key to the worker endpoints the routing tier last reported for
//! it. Entries are created lazily on first use, replaced wholesale, and
//! dropped when a worker signals invalidation. An empty list is a valid
//! cached state: the key is not addressable right now.

use std::collections::HashMap;
use tracing::debug;

/// Cache of key → worker endpoint addresses.
#[derive(Debug, Default)]
pub struct AddressCache {
    entries: HashMap<Vec<u8>, Vec<String>>,
}

impl AddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached endpoint list, if this key has one.
    pub fn cached(&self, key: &[u8]) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// How many endpoints are cached for a key, if any.
    pub fn cached_len(&self, key: &[u8]) -> Option<usize> {
        self.entries.get(key).map(Vec::len)
    }

    /// Replace the entry for a key with a fresh endpoint list.
    pub fn insert(&mut self, key: Vec<u8>, addresses: Vec<String>) {
        debug!(
            key = %String::from_utf8_lossy(&key),
            replicas = addresses.len(),
            "caching worker addresses"
        );
        self.entries.insert(key, addresses);
    }

    /// Drop the entry for a key, unconditionally.
    pub fn invalidate(&mut self, key: &[u8]) {
        if self.entries.remove(key).is_some() {
            debug!(
                key = %String::from_utf8_lossy(key),
                "invalidated cached worker addresses"
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
