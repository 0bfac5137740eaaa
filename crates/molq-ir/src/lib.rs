//! molq circuit intermediate representation.
//!
//! A [`Circuit`] is a flat, ordered list of [`Instruction`]s over a fixed
//! register of qubits. Gates carry concrete rotation angles; parameterized
//! circuits are produced by binding a parameter vector in the ansatz
//! builders of `molq-vqe`.
//!
//! ```
//! use molq_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::QubitId;
