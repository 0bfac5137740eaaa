//! Simulator errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("{requested} qubits requested, the statevector simulator supports at most {max}")]
    TooManyQubits { requested: usize, max: usize },

    #[error("observable acts on {observable} qubits but the circuit has {circuit}")]
    WidthMismatch { circuit: usize, observable: usize },

    #[error("shot-based estimation needs at least one shot")]
    ZeroShots,

    #[error("cannot sample {shots} shots with P(+1) = {probability}")]
    InvalidProbability { shots: u32, probability: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
