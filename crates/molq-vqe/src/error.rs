//! Error types for the variational stages.

use molq_adapter_sim::SimError;
use molq_chem::ChemError;
use molq_ir::IrError;
use molq_ops::OpsError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VqeError {
    #[error(transparent)]
    Chem(#[from] ChemError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Ir(#[from] IrError),

    #[error(transparent)]
    Ops(#[from] OpsError),

    #[error("ansatz expects {expected} parameters, got {got}")]
    ParameterMismatch { expected: usize, got: usize },

    #[error("invalid ansatz: {0}")]
    InvalidAnsatz(String),

    #[error("exact diagonalization is limited to {max} qubits, the operator has {num_qubits}")]
    TooManyQubitsForExact { num_qubits: usize, max: usize },

    #[error("objective returned a non-finite value ({0})")]
    NonFiniteObjective(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, VqeError>;
