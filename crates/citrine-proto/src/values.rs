//! Serialized representations of the storable lattice kinds.
//!
//! These structs are the wire schema: flat, serde-derived, and free of
//! lattice machinery. Vector clocks travel as plain node-to-integer maps;
//! the in-memory counter lattices never appear here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire form of a last-writer-wins pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LwwValue {
    pub timestamp: u64,
    pub value: Vec<u8>,
}

/// Wire form of both the unordered and the ordered set lattices.
///
/// For the ordered kind the values are in ascending order on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetValue {
    pub values: Vec<Vec<u8>>,
}

/// Wire form of a single-key causal value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleKeyCausalValue {
    pub vector_clock: BTreeMap<String, u64>,
    pub values: Vec<Vec<u8>>,
}

/// One dependency entry of a multi-key causal value: the vector clock
/// observed for another KVS key at write time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyVersion {
    pub key: Vec<u8>,
    pub vector_clock: BTreeMap<String, u64>,
}

/// Wire form of a multi-key causal value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiKeyCausalValue {
    pub vector_clock: BTreeMap<String, u64>,
    pub dependencies: Vec<KeyVersion>,
    pub values: Vec<Vec<u8>>,
}

/// Wire form of a priority pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityValue {
    pub priority: u64,
    pub value: Vec<u8>,
}
