//! Local simulator backend for molq.
//!
//! [`Statevector`] runs `molq-ir` circuits exactly; the [`Estimator`]
//! implementations turn a circuit and a `PauliHamiltonian` into an energy,
//! either exactly ([`StatevectorEstimator`]) or with seeded shot noise
//! ([`ShotEstimator`]).
//!
//! ```
//! use molq_adapter_sim::{Estimator, StatevectorEstimator};
//! use molq_ir::{Circuit, QubitId};
//! use molq_ops::{PauliHamiltonian, PauliTerm};
//!
//! let mut circuit = Circuit::with_size("flip", 1);
//! circuit.x(QubitId(0)).unwrap();
//! let h = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0)]);
//! let energy = StatevectorEstimator::new().estimate(&circuit, &h).unwrap();
//! assert_eq!(energy, -1.0);
//! ```

pub mod error;
pub mod estimator;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use estimator::{Estimator, ShotEstimator, StatevectorEstimator};
pub use statevector::{MAX_QUBITS, Statevector};
