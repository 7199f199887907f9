// File: `crates/citrine-lattice/src/lib.rs`
pub mod causal;
pub mod error;
pub mod lattice;
pub mod lww;
pub mod map;
pub mod max_int;
pub mod ordered_set;
pub mod priority;
pub mod set;
pub mod value;
pub mod vector_clock;

pub use causal::{MultiKeyCausalLattice, SingleKeyCausalLattice};
pub use error::LatticeError;
pub use lattice::Lattice;
pub use lww::LwwLattice;
pub use map::MapLattice;
pub use max_int::MaxIntLattice;
pub use ordered_set::OrderedSetLattice;
pub use priority::PriorityLattice;
pub use set::SetLattice;
pub use value::{LatticeKind, LatticeValue};
pub use vector_clock::{Causality, VectorClock};
