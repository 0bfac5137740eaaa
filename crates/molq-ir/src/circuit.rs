//! Circuit container and gate builder methods.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// An ordered gate sequence over `num_qubits` qubits.
///
/// Every builder method validates its qubit operands and returns
/// `&mut Self` so calls can be chained with `?`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit with a fixed register width.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Append a gate after validating arity, range and distinctness.
    pub fn append(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        if gate.num_qubits() != qubits.len() {
            return Err(IrError::ArityMismatch {
                gate: gate.name(),
                expected: gate.num_qubits(),
                got: qubits.len(),
            });
        }
        if let Some(angle) = gate.angle() {
            if !angle.is_finite() {
                return Err(IrError::NonFiniteAngle {
                    gate: gate.name(),
                    angle,
                });
            }
        }
        for (i, &q) in qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
            if qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    gate: gate.name(),
                    qubit: q,
                });
            }
        }
        self.instructions
            .push(Instruction::new(gate, qubits.to_vec()));
        Ok(self)
    }

    pub fn h(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::H, &[q])
    }

    pub fn x(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::X, &[q])
    }

    pub fn y(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::Y, &[q])
    }

    pub fn z(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::Z, &[q])
    }

    pub fn s(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::S, &[q])
    }

    pub fn sdg(&mut self, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::Sdg, &[q])
    }

    pub fn rx(&mut self, theta: f64, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::Rx(theta), &[q])
    }

    pub fn ry(&mut self, theta: f64, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::Ry(theta), &[q])
    }

    pub fn rz(&mut self, theta: f64, q: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::Rz(theta), &[q])
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::CX, &[control, target])
    }

    pub fn cz(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.append(StandardGate::CZ, &[q0, q1])
    }

    /// Append all instructions of `other` (same width) to this circuit.
    pub fn compose(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        if other.num_qubits != self.num_qubits {
            return Err(IrError::WidthMismatch {
                this: self.num_qubits,
                other: other.num_qubits,
            });
        }
        self.instructions.extend(other.instructions.iter().cloned());
        Ok(self)
    }

    /// Circuit depth: the longest chain of instructions sharing qubits.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits as usize];
        for instr in &self.instructions {
            let next = instr
                .qubits
                .iter()
                .map(|q| layer[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &instr.qubits {
                layer[q.index()] = next;
            }
        }
        layer.into_iter().max().unwrap_or(0)
    }

    /// Gate counts keyed by mnemonic.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for instr in &self.instructions {
            *counts.entry(instr.gate.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of two-qubit gates.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.gate.num_qubits() == 2)
            .count()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "circuit {} ({} qubits, {} instructions, depth {}):",
            self.name,
            self.num_qubits,
            self.instructions.len(),
            self.depth()
        )?;
        for instr in &self.instructions {
            writeln!(f, "  {}", instr)?;
        }
        Ok(())
    }
}
