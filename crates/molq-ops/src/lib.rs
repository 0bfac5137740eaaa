//! Qubit operators for molq.
//!
//! - [`PauliString`]: a tensor product of single-qubit Paulis in symplectic
//!   (x, z) bitmask form, up to 64 qubits.
//! - [`SparsePauliOp`]: a complex-weighted sum of Pauli strings, closed
//!   under composition. Fermion-to-qubit mappers build these.
//! - [`PauliHamiltonian`]: a real-weighted sum, the Hermitian operator handed
//!   to estimators and eigensolvers.

pub mod error;
pub mod hamiltonian;
pub mod pauli;
pub mod sparse;

pub use error::{OpsError, OpsResult};
pub use hamiltonian::{PauliHamiltonian, PauliTerm};
pub use pauli::{Pauli, PauliString, MAX_QUBITS};
pub use sparse::SparsePauliOp;
