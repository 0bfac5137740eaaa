//! Error types for qubit operators.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OpsError {
    #[error("qubit index {qubit} exceeds the {max}-qubit limit of a Pauli string")]
    QubitLimit { qubit: usize, max: usize },

    #[error("term acts on qubit {qubit} but the operator has {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    #[error("operator widths differ: {left} vs {right} qubits")]
    WidthMismatch { left: usize, right: usize },

    #[error("invalid Pauli label character {0:?}")]
    InvalidLabel(char),

    #[error("operator is not Hermitian: term {label} has imaginary weight {imag:e}")]
    NonHermitian { label: String, imag: f64 },
}

pub type OpsResult<T> = Result<T, OpsError>;
