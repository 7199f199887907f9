//! Conversion between in-memory lattice values and tagged wire payloads.
//!
//! `serialize_lattice` flattens a [`LatticeValue`] into `(payload bytes,
//! kind tag)`; `deserialize_lattice` reverses it. Every kind round-trips
//! under reveal-equality, and the tag always matches the kind that
//! produced the payload.

use crate::error::ProtoError;
use crate::values::{
    KeyVersion, LwwValue, MultiKeyCausalValue, PriorityValue, SetValue, SingleKeyCausalValue,
};
use citrine_lattice::{
    LatticeKind, LatticeValue, LwwLattice, MapLattice, MultiKeyCausalLattice, OrderedSetLattice,
    PriorityLattice, SetLattice, SingleKeyCausalLattice, VectorClock,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode any wire message or payload struct to bytes.
pub fn encode_message<M: Serialize>(message: &M) -> Result<Vec<u8>, ProtoError> {
    bincode::serialize(message).map_err(ProtoError::Encode)
}

/// Decode any wire message or payload struct from bytes.
pub fn decode_message<M: DeserializeOwned>(bytes: &[u8]) -> Result<M, ProtoError> {
    bincode::deserialize(bytes).map_err(ProtoError::Decode)
}

/// Serialize a lattice value into its wire payload and kind tag.
pub fn serialize_lattice(value: &LatticeValue) -> Result<(Vec<u8>, LatticeKind), ProtoError> {
    let payload = match value {
        LatticeValue::Lww(lww) => encode_message(&LwwValue {
            timestamp: lww.timestamp(),
            value: lww.reveal().to_vec(),
        })?,
        LatticeValue::Set(set) => encode_message(&SetValue {
            values: set.iter().cloned().collect(),
        })?,
        LatticeValue::OrderedSet(set) => encode_message(&SetValue {
            values: set.reveal().to_vec(),
        })?,
        LatticeValue::SingleCausal(causal) => encode_message(&SingleKeyCausalValue {
            vector_clock: causal.vector_clock().to_counts(),
            values: causal.reveal().iter().cloned().collect(),
        })?,
        LatticeValue::MultiCausal(causal) => encode_message(&MultiKeyCausalValue {
            vector_clock: causal.vector_clock().to_counts(),
            dependencies: causal
                .dependencies()
                .iter()
                .map(|(key, vc)| KeyVersion {
                    key: key.clone(),
                    vector_clock: vc.to_counts(),
                })
                .collect(),
            values: causal.reveal().iter().cloned().collect(),
        })?,
        LatticeValue::Priority(priority) => encode_message(&PriorityValue {
            priority: priority.priority(),
            value: priority.reveal().to_vec(),
        })?,
    };

    Ok((payload, value.kind()))
}

/// Deserialize a wire payload according to its raw kind tag.
///
/// Tags outside the closed family fail with
/// [`ProtoError::UnsupportedLatticeKind`].
pub fn deserialize_lattice(payload: &[u8], tag: u8) -> Result<LatticeValue, ProtoError> {
    let kind = LatticeKind::from_tag(tag).ok_or(ProtoError::UnsupportedLatticeKind(tag))?;

    let value = match kind {
        LatticeKind::Lww => {
            let val: LwwValue = decode_message(payload)?;
            LwwLattice::new(val.timestamp, val.value).into()
        }
        LatticeKind::Set => {
            let val: SetValue = decode_message(payload)?;
            val.values.into_iter().collect::<SetLattice>().into()
        }
        LatticeKind::OrderedSet => {
            // Insert one by one: ascending wire order hits the tail fast
            // path, and out-of-order senders are still handled.
            let val: SetValue = decode_message(payload)?;
            val.values
                .into_iter()
                .collect::<OrderedSetLattice>()
                .into()
        }
        LatticeKind::SingleCausal => {
            let val: SingleKeyCausalValue = decode_message(payload)?;
            SingleKeyCausalLattice::new(
                VectorClock::from_counts(val.vector_clock),
                val.values.into_iter().collect(),
            )
            .into()
        }
        LatticeKind::MultiCausal => {
            let val: MultiKeyCausalValue = decode_message(payload)?;
            let mut dependencies = MapLattice::new();
            for dep in val.dependencies {
                dependencies.merge_entry(dep.key, VectorClock::from_counts(dep.vector_clock));
            }
            MultiKeyCausalLattice::new(
                VectorClock::from_counts(val.vector_clock),
                dependencies,
                val.values.into_iter().collect(),
            )
            .into()
        }
        LatticeKind::Priority => {
            let val: PriorityValue = decode_message(payload)?;
            PriorityLattice::new(val.priority, val.value).into()
        }
    };

    Ok(value)
}
