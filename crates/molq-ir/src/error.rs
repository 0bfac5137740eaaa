//! Error types for circuit construction.

use thiserror::Error;

use crate::qubit::QubitId;

/// Errors raised while building or combining circuits.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IrError {
    #[error("qubit {qubit} is out of range for a {num_qubits}-qubit circuit")]
    QubitOutOfRange { qubit: QubitId, num_qubits: u32 },

    #[error("gate {gate} applied twice to qubit {qubit}")]
    DuplicateQubit { gate: &'static str, qubit: QubitId },

    #[error("gate {gate} expects {expected} qubits, got {got}")]
    ArityMismatch {
        gate: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("cannot compose a {other}-qubit circuit onto a {this}-qubit circuit")]
    WidthMismatch { this: u32, other: u32 },

    #[error("rotation angle for {gate} is not finite: {angle}")]
    NonFiniteAngle { gate: &'static str, angle: f64 },
}

pub type IrResult<T> = Result<T, IrError>;
