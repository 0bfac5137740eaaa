//! Dense statevector simulation.
//!
//! Qubit `q` is bit `q` of the basis-state index (little endian), matching
//! the Pauli-string convention of `molq-ops`.

use molq_ir::{Circuit, Instruction, StandardGate};
use molq_ops::{PauliHamiltonian, PauliString};
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Largest register the simulator will allocate (2^24 amplitudes).
pub const MAX_QUBITS: usize = 24;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// `|0...0⟩` on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Run `circuit` from `|0...0⟩`.
    pub fn from_circuit(circuit: &Circuit) -> SimResult<Self> {
        let mut state = Self::new(circuit.num_qubits())?;
        for instruction in circuit.instructions() {
            state.apply(instruction);
        }
        Ok(state)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Apply one instruction. Qubit indices are validated when the circuit
    /// is built.
    pub fn apply(&mut self, instruction: &Instruction) {
        let q = |k: usize| instruction.qubits[k].index();
        match instruction.gate {
            StandardGate::H => {
                let h = std::f64::consts::FRAC_1_SQRT_2;
                self.apply_single(q(0), |a, b| ((a + b) * h, (a - b) * h));
            }
            StandardGate::X => self.apply_single(q(0), |a, b| (b, a)),
            StandardGate::Y => self.apply_single(q(0), |a, b| (-I * b, I * a)),
            StandardGate::Z => self.apply_phase(q(0), -ONE),
            StandardGate::S => self.apply_phase(q(0), I),
            StandardGate::Sdg => self.apply_phase(q(0), -I),
            StandardGate::Rx(theta) => {
                let (c, s) = half_angle(theta);
                let mis = Complex64::new(0.0, -s);
                self.apply_single(q(0), |a, b| (a * c + b * mis, a * mis + b * c));
            }
            StandardGate::Ry(theta) => {
                let (c, s) = half_angle(theta);
                self.apply_single(q(0), |a, b| (a * c - b * s, a * s + b * c));
            }
            StandardGate::Rz(theta) => {
                let phase0 = Complex64::from_polar(1.0, -theta / 2.0);
                let phase1 = Complex64::from_polar(1.0, theta / 2.0);
                self.apply_single(q(0), |a, b| (a * phase0, b * phase1));
            }
            StandardGate::CX => {
                let (control, target) = (1usize << q(0), 1usize << q(1));
                for i in 0..self.amplitudes.len() {
                    if i & control != 0 && i & target == 0 {
                        self.amplitudes.swap(i, i | target);
                    }
                }
            }
            StandardGate::CZ => {
                let mask = (1usize << q(0)) | (1usize << q(1));
                for (i, amp) in self.amplitudes.iter_mut().enumerate() {
                    if i & mask == mask {
                        *amp = -*amp;
                    }
                }
            }
        }
    }

    /// Apply a 2x2 kernel to every amplitude pair differing in bit `q`.
    fn apply_single(&mut self, q: usize, kernel: impl Fn(Complex64, Complex64) -> (Complex64, Complex64)) {
        let bit = 1usize << q;
        for i in 0..self.amplitudes.len() {
            if i & bit == 0 {
                let j = i | bit;
                let (a, b) = kernel(self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = a;
                self.amplitudes[j] = b;
            }
        }
    }

    /// Multiply amplitudes with bit `q` set by `phase`.
    fn apply_phase(&mut self, q: usize, phase: Complex64) {
        let bit = 1usize << q;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & bit != 0 {
                *amp *= phase;
            }
        }
    }

    /// `⟨ψ|P|ψ⟩` for one Pauli string.
    ///
    /// With symplectic masks `(x, z)`, `P|i⟩ = i^{#Y} (-1)^{|i & z|} |i ⊕ x⟩`.
    pub fn expectation_pauli(&self, pauli: &PauliString) -> f64 {
        let (x, z) = pauli.masks();
        let (x, z) = (x as usize, z as usize);
        let y_phase = match pauli.num_y() % 4 {
            0 => ONE,
            1 => I,
            2 => -ONE,
            _ => -I,
        };
        let mut sum = ZERO;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let sign = if (i & z).count_ones() % 2 == 1 { -1.0 } else { 1.0 };
            sum += self.amplitudes[i ^ x].conj() * *amp * sign;
        }
        (sum * y_phase).re
    }

    /// `⟨ψ|H|ψ⟩`.
    pub fn expectation(&self, hamiltonian: &PauliHamiltonian) -> SimResult<f64> {
        if hamiltonian.num_qubits() > self.num_qubits {
            return Err(SimError::WidthMismatch {
                circuit: self.num_qubits,
                observable: hamiltonian.num_qubits(),
            });
        }
        Ok(hamiltonian
            .terms
            .iter()
            .map(|term| {
                if term.is_identity() {
                    term.coefficient
                } else {
                    term.coefficient * self.expectation_pauli(&term.pauli)
                }
            })
            .sum())
    }
}

fn half_angle(theta: f64) -> (f64, f64) {
    ((theta / 2.0).cos(), (theta / 2.0).sin())
}
