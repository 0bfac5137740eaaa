//! Pauli Hamiltonian representation.
//!
//! A Hamiltonian is represented as a sum of Pauli strings:
//! H = Σᵢ cᵢ Pᵢ
//! with real coefficients cᵢ, so H is Hermitian by construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::OpsResult;
use crate::pauli::{Pauli, PauliString};

/// A single term cᵢ * (P₀ ⊗ P₁ ⊗ ... ⊗ Pₙ).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    /// The coefficient of this term.
    pub coefficient: f64,
    /// The Pauli string, identity on unlisted qubits.
    pub pauli: PauliString,
}

impl PauliTerm {
    /// Create a term from explicit `(qubit, pauli)` pairs.
    pub fn new(coefficient: f64, operators: &[(usize, Pauli)]) -> OpsResult<Self> {
        Ok(Self::with_string(coefficient, PauliString::from_operators(operators)?))
    }

    pub fn with_string(coefficient: f64, pauli: PauliString) -> Self {
        Self { coefficient, pauli }
    }

    /// Create an identity term (scalar).
    pub fn identity(coefficient: f64) -> Self {
        Self::with_string(coefficient, PauliString::identity())
    }

    /// Create a single-qubit Z term.
    pub fn z(coefficient: f64, qubit: usize) -> Self {
        Self::with_string(coefficient, PauliString::single(qubit, Pauli::Z))
    }

    /// Create a single-qubit X term.
    pub fn x(coefficient: f64, qubit: usize) -> Self {
        Self::with_string(coefficient, PauliString::single(qubit, Pauli::X))
    }

    /// Create a ZZ term.
    pub fn zz(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::two(coefficient, qubit1, qubit2, Pauli::Z)
    }

    /// Create an XX term.
    pub fn xx(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::two(coefficient, qubit1, qubit2, Pauli::X)
    }

    /// Create a YY term.
    pub fn yy(coefficient: f64, qubit1: usize, qubit2: usize) -> Self {
        Self::two(coefficient, qubit1, qubit2, Pauli::Y)
    }

    fn two(coefficient: f64, qubit1: usize, qubit2: usize, pauli: Pauli) -> Self {
        let (_, pair) =
            PauliString::single(qubit1, pauli).compose(&PauliString::single(qubit2, pauli));
        Self::with_string(coefficient, pair)
    }

    /// Check if this is an identity term.
    pub fn is_identity(&self) -> bool {
        self.pauli.is_identity()
    }

    /// Non-identity operators as `(qubit, pauli)` pairs.
    pub fn operators(&self) -> impl Iterator<Item = (usize, Pauli)> + '_ {
        self.pauli.operators()
    }

    /// Get the maximum qubit index.
    pub fn max_qubit(&self) -> Option<usize> {
        self.pauli.max_qubit()
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient >= 0.0 {
            write!(f, "+{:.6} {}", self.coefficient, self.pauli)
        } else {
            write!(f, "{:.6} {}", self.coefficient, self.pauli)
        }
    }
}

/// A Hamiltonian represented as a sum of real-weighted Pauli terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliHamiltonian {
    num_qubits: usize,
    /// The terms in the Hamiltonian.
    pub terms: Vec<PauliTerm>,
}

impl PauliHamiltonian {
    /// Create a Hamiltonian sized to the highest qubit its terms touch.
    pub fn new(terms: Vec<PauliTerm>) -> Self {
        let num_qubits = terms
            .iter()
            .filter_map(|t| t.max_qubit())
            .max()
            .map(|m| m + 1)
            .unwrap_or(0);
        Self { num_qubits, terms }
    }

    /// Create a Hamiltonian on an explicit register width. The width grows if
    /// a term reaches beyond it.
    pub fn with_num_qubits(num_qubits: usize, terms: Vec<PauliTerm>) -> Self {
        let mut h = Self::new(terms);
        h.num_qubits = h.num_qubits.max(num_qubits);
        h
    }

    /// Add a term to the Hamiltonian.
    pub fn add_term(&mut self, term: PauliTerm) {
        if let Some(q) = term.max_qubit() {
            self.num_qubits = self.num_qubits.max(q + 1);
        }
        self.terms.push(term);
    }

    /// Get the number of terms.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the identity coefficient (if any).
    pub fn identity_coefficient(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(|t| t.coefficient)
            .sum()
    }

    /// Iterate over non-identity terms.
    pub fn non_identity_terms(&self) -> impl Iterator<Item = &PauliTerm> {
        self.terms.iter().filter(|t| !t.is_identity())
    }

    /// Weight of a given Pauli string, zero when absent.
    pub fn coefficient_of(&self, pauli: &PauliString) -> f64 {
        self.terms
            .iter()
            .filter(|t| &t.pauli == pauli)
            .map(|t| t.coefficient)
            .sum()
    }

    /// Sum of absolute weights, an upper bound on the spectral radius.
    pub fn one_norm(&self) -> f64 {
        self.terms.iter().map(|t| t.coefficient.abs()).sum()
    }
}

impl fmt::Display for PauliHamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Hamiltonian ({} terms, {} qubits):",
            self.num_terms(),
            self.num_qubits()
        )?;
        for term in &self.terms {
            writeln!(f, "  {}", term)?;
        }
        Ok(())
    }
}
