//! Trial-state circuits.

pub mod initial_state;
pub mod two_local;

pub use initial_state::{hartree_fock_bitstring, hartree_fock_state};
pub use two_local::{Entanglement, EntanglementGate, RotationGate, TwoLocal};
