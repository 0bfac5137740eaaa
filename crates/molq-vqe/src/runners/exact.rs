//! Dense diagonalization for small operators.

use molq_ops::PauliHamiltonian;
use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::debug;

use super::{MinimumEigensolver, MinimumEigensolverResult};
use crate::error::{Result, VqeError};

/// Widest operator the dense solver accepts.
pub const MAX_EXACT_QUBITS: usize = 12;

/// Reference eigensolver: builds the Hermitian matrix of the operator and
/// diagonalizes it.
///
/// With a particle sector set, only basis states with the requested number
/// of alpha and beta electrons are kept. This assumes Jordan-Wigner
/// encoding (qubit `j` is the occupation of spin orbital `j`, alpha block
/// first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactEigensolver {
    sector: Option<(usize, (usize, usize))>,
}

impl ExactEigensolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_particle_sector(
        mut self,
        num_spatial_orbitals: usize,
        num_particles: (usize, usize),
    ) -> Self {
        self.sector = Some((num_spatial_orbitals, num_particles));
        self
    }

    fn basis_states(&self, num_qubits: usize) -> Result<Vec<usize>> {
        let all = 0..1usize << num_qubits;
        let Some((n, (alpha, beta))) = self.sector else {
            return Ok(all.collect());
        };
        if 2 * n != num_qubits {
            return Err(VqeError::InvalidConfig(format!(
                "particle sector over {} spatial orbitals for a {}-qubit operator",
                n, num_qubits
            )));
        }
        let alpha_mask = (1usize << n) - 1;
        let states: Vec<usize> = all
            .filter(|s| {
                (s & alpha_mask).count_ones() as usize == alpha
                    && (s >> n).count_ones() as usize == beta
            })
            .collect();
        if states.is_empty() {
            return Err(VqeError::InvalidConfig(format!(
                "no states with ({}, {}) particles in {} orbitals",
                alpha, beta, n
            )));
        }
        Ok(states)
    }

    /// Matrix of `operator` on the selected basis states.
    pub fn matrix(&self, operator: &PauliHamiltonian) -> Result<DMatrix<Complex64>> {
        let num_qubits = operator.num_qubits();
        if num_qubits > MAX_EXACT_QUBITS {
            return Err(VqeError::TooManyQubitsForExact {
                num_qubits,
                max: MAX_EXACT_QUBITS,
            });
        }
        let states = self.basis_states(num_qubits)?;
        let mut position = vec![usize::MAX; 1 << num_qubits];
        for (i, &s) in states.iter().enumerate() {
            position[s] = i;
        }

        let dim = states.len();
        let mut matrix = DMatrix::<Complex64>::zeros(dim, dim);
        for term in &operator.terms {
            let (x, z) = term.pauli.masks();
            let y_phase = match term.pauli.num_y() % 4 {
                0 => Complex64::new(1.0, 0.0),
                1 => Complex64::new(0.0, 1.0),
                2 => Complex64::new(-1.0, 0.0),
                _ => Complex64::new(0.0, -1.0),
            };
            for (col, &s) in states.iter().enumerate() {
                // P|s⟩ = i^{#Y} (-1)^{|s ∧ z|} |s ⊕ x⟩
                let row = position[s ^ x as usize];
                if row == usize::MAX {
                    continue;
                }
                let sign = if (s as u64 & z).count_ones() % 2 == 1 { -1.0 } else { 1.0 };
                matrix[(row, col)] += y_phase * (sign * term.coefficient);
            }
        }
        Ok(matrix)
    }

    /// All eigenvalues in ascending order.
    pub fn eigenvalues(&self, operator: &PauliHamiltonian) -> Result<Vec<f64>> {
        let matrix = self.matrix(operator)?;
        let mut values: Vec<f64> = matrix.symmetric_eigenvalues().iter().copied().collect();
        values.sort_by(f64::total_cmp);
        debug!(dimension = values.len(), "exact diagonalization");
        Ok(values)
    }
}

impl MinimumEigensolver for ExactEigensolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn compute_minimum_eigenvalue(
        &mut self,
        operator: &PauliHamiltonian,
    ) -> Result<MinimumEigensolverResult> {
        let eigenvalue = self
            .eigenvalues(operator)?
            .first()
            .copied()
            .unwrap_or(0.0);
        Ok(MinimumEigensolverResult {
            eigenvalue,
            vqe: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use molq_ops::PauliTerm;

    #[test]
    fn test_single_qubit_spectrum() {
        // 0.3 X + 0.4 Z has eigenvalues ±0.5
        let h = PauliHamiltonian::new(vec![PauliTerm::x(0.3, 0), PauliTerm::z(0.4, 0)]);
        let values = ExactEigensolver::new().eigenvalues(&h).unwrap();
        assert_abs_diff_eq!(values[0], -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(values[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_yy_matrix_is_real() {
        let h = PauliHamiltonian::new(vec![PauliTerm::yy(1.0, 0, 1)]);
        let m = ExactEigensolver::new().matrix(&h).unwrap();
        // Y⊗Y |00⟩ = -|11⟩
        assert_eq!(m[(3, 0)], Complex64::new(-1.0, 0.0));
        assert_eq!(m[(2, 1)], Complex64::new(1.0, 0.0));
        assert!(m.iter().all(|c| c.im == 0.0));
    }

    #[test]
    fn test_particle_sector() {
        // number operator on 4 spin orbitals: Σ (I - Z_j) / 2
        let mut terms = vec![PauliTerm::identity(2.0)];
        terms.extend((0..4).map(|j| PauliTerm::z(-0.5, j)));
        let h = PauliHamiltonian::new(terms);

        let full = ExactEigensolver::new().eigenvalues(&h).unwrap();
        assert_eq!(full.len(), 16);
        assert_abs_diff_eq!(full[0], 0.0, epsilon = 1e-12);

        let sector = ExactEigensolver::new().with_particle_sector(2, (1, 1));
        let values = sector.eigenvalues(&h).unwrap();
        assert_eq!(values.len(), 4);
        assert!(values.iter().all(|v| (v - 2.0).abs() < 1e-12));

        let empty = ExactEigensolver::new().with_particle_sector(2, (3, 0));
        assert!(matches!(empty.eigenvalues(&h), Err(VqeError::InvalidConfig(_))));
        let mismatched = ExactEigensolver::new().with_particle_sector(3, (1, 1));
        assert!(matches!(mismatched.eigenvalues(&h), Err(VqeError::InvalidConfig(_))));
    }

    #[test]
    fn test_qubit_limit() {
        let h = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 12)]);
        assert!(matches!(
            ExactEigensolver::new().eigenvalues(&h),
            Err(VqeError::TooManyQubitsForExact { num_qubits: 13, max: 12 })
        ));
    }
}
