//! Standard gate set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gates understood by the simulator.
///
/// Rotation gates carry their bound angle in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Phase gate sqrt(Z).
    S,
    /// Inverse phase gate.
    Sdg,
    /// exp(-i theta X / 2).
    Rx(f64),
    /// exp(-i theta Y / 2).
    Ry(f64),
    /// exp(-i theta Z / 2).
    Rz(f64),
    /// Controlled-X, qubits ordered (control, target).
    CX,
    /// Controlled-Z (symmetric).
    CZ,
}

impl StandardGate {
    /// Lowercase mnemonic, matching OpenQASM names.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::CX | StandardGate::CZ => 2,
            _ => 1,
        }
    }

    /// The rotation angle, if this is a rotation gate.
    pub fn angle(&self) -> Option<f64> {
        match self {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                Some(*theta)
            }
            _ => None,
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle() {
            Some(theta) => write!(f, "{}({:.6})", self.name(), theta),
            None => write!(f, "{}", self.name()),
        }
    }
}
