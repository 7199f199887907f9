//! Join-semilattice trait - the replication-safety foundation of the store
//!
//! A join-semilattice (S, ⊔) satisfies:
//! - Commutativity: a ⊔ b = b ⊔ a
//! - Associativity: (a ⊔ b) ⊔ c = a ⊔ (b ⊔ c)
//! - Idempotence:  a ⊔ a = a
//!
//! These properties guarantee that replicas converge no matter how often
//! messages are delayed, duplicated, or reordered.

/// The core lattice trait. Every value stored in the KVS implements this.
///
/// Merge is in-place on the receiver: nested lattices (maps, vector clocks,
/// causal values) all fold their operand into `self`, and the operand is
/// never mutated.
pub trait Lattice: Clone + PartialEq {
    /// Merge operation (least upper bound): self = self ⊔ other
    /// Must be commutative, associative, and idempotent.
    fn merge(&mut self, other: &Self);

    /// Join two lattices into a fresh value.
    fn join(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}
