//! Complex-weighted sums of Pauli strings.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::fmt;

use crate::error::{OpsError, OpsResult};
use crate::hamiltonian::{PauliHamiltonian, PauliTerm};
use crate::pauli::{MAX_QUBITS, PauliString, phase_to_complex};

/// `sum_k c_k P_k` over a fixed number of qubits.
///
/// Terms keep insertion order; [`SparsePauliOp::simplify`] merges duplicates
/// in order of first appearance, so the result is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsePauliOp {
    num_qubits: usize,
    terms: Vec<(PauliString, Complex64)>,
}

impl SparsePauliOp {
    /// The zero operator on `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> OpsResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(OpsError::QubitLimit {
                qubit: num_qubits - 1,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            num_qubits,
            terms: Vec::new(),
        })
    }

    /// `coeff * I`.
    pub fn identity(num_qubits: usize, coeff: Complex64) -> OpsResult<Self> {
        let mut op = Self::zero(num_qubits)?;
        op.terms.push((PauliString::identity(), coeff));
        Ok(op)
    }

    pub fn from_terms(
        num_qubits: usize,
        terms: impl IntoIterator<Item = (PauliString, Complex64)>,
    ) -> OpsResult<Self> {
        let mut op = Self::zero(num_qubits)?;
        for (pauli, coeff) in terms {
            op.add_term(pauli, coeff)?;
        }
        Ok(op)
    }

    pub fn add_term(&mut self, pauli: PauliString, coeff: Complex64) -> OpsResult<()> {
        if let Some(q) = pauli.max_qubit() {
            if q >= self.num_qubits {
                return Err(OpsError::QubitOutOfRange {
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        self.terms.push((pauli, coeff));
        Ok(())
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(PauliString, Complex64)] {
        &self.terms
    }

    /// Multiply every weight by `factor`.
    pub fn scale(mut self, factor: Complex64) -> Self {
        for (_, c) in &mut self.terms {
            *c *= factor;
        }
        self
    }

    /// Sum of two operators (no simplification).
    pub fn add(&self, other: &SparsePauliOp) -> OpsResult<Self> {
        self.check_width(other)?;
        let mut out = self.clone();
        out.terms.extend(other.terms.iter().copied());
        Ok(out)
    }

    /// Accumulate `other` into `self` in place.
    pub fn add_assign(&mut self, other: &SparsePauliOp) -> OpsResult<()> {
        self.check_width(other)?;
        self.terms.extend(other.terms.iter().copied());
        Ok(())
    }

    /// Operator product `self * other`.
    pub fn compose(&self, other: &SparsePauliOp) -> OpsResult<Self> {
        self.check_width(other)?;
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        for (p, a) in &self.terms {
            for (q, b) in &other.terms {
                let (k, pq) = p.compose(q);
                terms.push((pq, a * b * phase_to_complex(k)));
            }
        }
        Ok(Self {
            num_qubits: self.num_qubits,
            terms,
        })
    }

    /// Hermitian adjoint. Pauli strings are Hermitian, so only weights change.
    pub fn adjoint(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            terms: self.terms.iter().map(|(p, c)| (*p, c.conj())).collect(),
        }
    }

    /// Merge equal strings and drop weights with modulus `<= atol`.
    pub fn simplify(&self, atol: f64) -> Self {
        let mut index: FxHashMap<PauliString, usize> = FxHashMap::default();
        let mut merged: Vec<(PauliString, Complex64)> = Vec::new();
        for &(pauli, coeff) in &self.terms {
            match index.get(&pauli) {
                Some(&i) => merged[i].1 += coeff,
                None => {
                    index.insert(pauli, merged.len());
                    merged.push((pauli, coeff));
                }
            }
        }
        merged.retain(|(_, c)| c.norm() > atol);
        Self {
            num_qubits: self.num_qubits,
            terms: merged,
        }
    }

    /// Whether the simplified operator has only real weights.
    pub fn is_hermitian(&self, atol: f64) -> bool {
        self.simplify(atol).terms.iter().all(|(_, c)| c.im.abs() <= atol)
    }

    /// Convert to a real-weighted Hamiltonian, failing if any merged weight
    /// keeps an imaginary part above `atol`.
    pub fn to_hamiltonian(&self, atol: f64) -> OpsResult<PauliHamiltonian> {
        let simplified = self.simplify(atol);
        let mut terms = Vec::with_capacity(simplified.terms.len());
        for (pauli, coeff) in simplified.terms {
            if coeff.im.abs() > atol {
                return Err(OpsError::NonHermitian {
                    label: pauli.label(self.num_qubits),
                    imag: coeff.im,
                });
            }
            if coeff.re.abs() > atol {
                terms.push(PauliTerm::with_string(coeff.re, pauli));
            }
        }
        Ok(PauliHamiltonian::with_num_qubits(self.num_qubits, terms))
    }

    fn check_width(&self, other: &SparsePauliOp) -> OpsResult<()> {
        if self.num_qubits != other.num_qubits {
            return Err(OpsError::WidthMismatch {
                left: self.num_qubits,
                right: other.num_qubits,
            });
        }
        Ok(())
    }
}

impl fmt::Display for SparsePauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "SparsePauliOp ({} terms, {} qubits):",
            self.terms.len(),
            self.num_qubits
        )?;
        for (pauli, c) in &self.terms {
            writeln!(
                f,
                "  ({:+.6}{:+.6}i) {}",
                c.re,
                c.im,
                pauli.label(self.num_qubits)
            )?;
        }
        Ok(())
    }
}
