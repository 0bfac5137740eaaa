//! A gate applied to concrete qubits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// One step of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub gate: StandardGate,
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    pub fn new(gate: StandardGate, qubits: Vec<QubitId>) -> Self {
        Self { gate, qubits }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gate)?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i == 0 {
                write!(f, " {}", q)?;
            } else {
                write!(f, ", {}", q)?;
            }
        }
        Ok(())
    }
}
