//! Minimum-eigenvalue solvers and the ground-state driver on top of them.

pub mod exact;
pub mod ground_state;
pub mod vqe;

pub use exact::{ExactEigensolver, MAX_EXACT_QUBITS};
pub use ground_state::{GroundStateEigensolver, GroundStateResult};
pub use vqe::{InitialPoint, Vqe, VqeResult, DEFAULT_SEED};

use molq_ops::PauliHamiltonian;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of a minimum-eigenvalue computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumEigensolverResult {
    pub eigenvalue: f64,
    /// Optimizer trace, for variational solvers.
    pub vqe: Option<VqeResult>,
}

/// Something that estimates the lowest eigenvalue of a qubit operator.
pub trait MinimumEigensolver {
    fn name(&self) -> &'static str;

    fn compute_minimum_eigenvalue(
        &mut self,
        operator: &PauliHamiltonian,
    ) -> Result<MinimumEigensolverResult>;
}
