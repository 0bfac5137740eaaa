//! Closed-shell restricted Hartree-Fock.
//!
//! Core-Hamiltonian guess, symmetric (Löwdin) orthogonalization and Pulay
//! DIIS on the commutator error `FPS - SPF`.

use nalgebra::{DMatrix, DVector};
use ndarray::Array4;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use crate::error::{ChemError, ChemResult};
use crate::integrals::AoIntegrals;

/// Smallest overlap eigenvalue accepted before the basis is considered
/// linearly dependent.
const OVERLAP_THRESHOLD: f64 = 1e-10;

/// Below this commutator error the B matrix is numerically singular and the
/// plain Fock matrix is used.
const DIIS_MIN_ERROR: f64 = 1e-12;

/// Converged (or final) RHF state.
#[derive(Debug, Clone)]
pub struct ScfSolution {
    /// Electronic energy, without nuclear repulsion.
    pub electronic_energy: f64,
    /// MO coefficients, one orbital per column, ascending orbital energy.
    pub mo_coefficients: DMatrix<f64>,
    pub orbital_energies: DVector<f64>,
    pub density: DMatrix<f64>,
    pub iterations: usize,
}

/// RHF solver settings.
#[derive(Debug, Clone)]
pub struct RestrictedHartreeFock {
    pub max_iterations: usize,
    /// Energy change threshold between iterations.
    pub energy_tolerance: f64,
    /// RMS density change threshold between iterations.
    pub density_tolerance: f64,
    /// DIIS subspace size; zero disables extrapolation.
    pub diis_size: usize,
}

impl Default for RestrictedHartreeFock {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            energy_tolerance: 1e-10,
            density_tolerance: 1e-8,
            diis_size: 8,
        }
    }
}

impl RestrictedHartreeFock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_energy_tolerance(mut self, tol: f64) -> Self {
        self.energy_tolerance = tol;
        self
    }

    pub fn with_diis_size(mut self, size: usize) -> Self {
        self.diis_size = size;
        self
    }

    /// Run the SCF for `num_occupied` doubly occupied orbitals.
    pub fn solve(&self, ints: &AoIntegrals, num_occupied: usize) -> ChemResult<ScfSolution> {
        let h = ints.core_hamiltonian();
        let s = &ints.overlap;
        let x = orthogonalizer(s)?;

        let mut density = density_matrix(&diagonalize(&h, &x).0, num_occupied);
        let mut diis = Diis::new(self.diis_size);
        let mut energy = 0.0;
        let mut delta_energy = f64::INFINITY;

        for iteration in 1..=self.max_iterations {
            let fock = &h + two_electron_matrix(&ints.eri, &density);
            let new_energy = 0.5 * density.component_mul(&(&h + &fock)).sum();
            delta_energy = new_energy - energy;
            energy = new_energy;

            let fock = if self.diis_size > 0 {
                let error = &fock * &density * s - s * &density * &fock;
                diis.push(fock.clone(), error);
                diis.extrapolate().unwrap_or(fock)
            } else {
                fock
            };

            let (coefficients, orbital_energies) = diagonalize(&fock, &x);
            let new_density = density_matrix(&coefficients, num_occupied);
            let delta_density = rms(&(&new_density - &density));
            density = new_density;

            debug!(
                iteration,
                energy, delta_energy, delta_density, "SCF iteration"
            );

            if iteration > 1
                && delta_energy.abs() < self.energy_tolerance
                && delta_density < self.density_tolerance
            {
                info!(iterations = iteration, energy, "SCF converged");
                return Ok(ScfSolution {
                    electronic_energy: energy,
                    mo_coefficients: coefficients,
                    orbital_energies,
                    density,
                    iterations: iteration,
                });
            }
        }

        warn!(
            iterations = self.max_iterations,
            delta_energy, "SCF did not converge"
        );
        Err(ChemError::ScfNotConverged {
            iterations: self.max_iterations,
            delta_energy,
        })
    }
}

/// `S^{-1/2}`.
pub fn orthogonalizer(overlap: &DMatrix<f64>) -> ChemResult<DMatrix<f64>> {
    let eig = overlap.clone().symmetric_eigen();
    let min_eigenvalue = eig.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    if min_eigenvalue < OVERLAP_THRESHOLD {
        return Err(ChemError::SingularOverlap { min_eigenvalue });
    }
    let inv_sqrt = eig.eigenvalues.map(|v| 1.0 / v.sqrt());
    Ok(&eig.eigenvectors * DMatrix::from_diagonal(&inv_sqrt) * eig.eigenvectors.transpose())
}

/// Solve `F C = S C ε` through the orthogonal basis `X`. Orbitals come back
/// sorted by energy with the largest-magnitude coefficient of each made
/// positive so repeated runs produce identical phases.
fn diagonalize(fock: &DMatrix<f64>, x: &DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let f_prime = x.transpose() * fock * x;
    let eig = f_prime.symmetric_eigen();

    let mut order: Vec<usize> = (0..eig.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let energies = DVector::from_iterator(order.len(), order.iter().map(|&i| eig.eigenvalues[i]));
    let mut coefficients = x * eig.eigenvectors.select_columns(&order);

    for mut column in coefficients.column_iter_mut() {
        let pivot = column
            .iter()
            .copied()
            .fold(0.0_f64, |best, v| if v.abs() > best.abs() + 1e-12 { v } else { best });
        if pivot < 0.0 {
            column.neg_mut();
        }
    }
    (coefficients, energies)
}

fn density_matrix(coefficients: &DMatrix<f64>, num_occupied: usize) -> DMatrix<f64> {
    let occupied = coefficients.columns(0, num_occupied);
    2.0 * &occupied * occupied.transpose()
}

/// `G_μν = Σ_λσ P_λσ [(μν|λσ) - ½ (μλ|νσ)]`.
fn two_electron_matrix(eri: &Array4<f64>, density: &DMatrix<f64>) -> DMatrix<f64> {
    let n = density.nrows();
    DMatrix::from_fn(n, n, |mu, nu| {
        let mut g = 0.0;
        for lambda in 0..n {
            for sigma in 0..n {
                g += density[(lambda, sigma)]
                    * (eri[[mu, nu, lambda, sigma]] - 0.5 * eri[[mu, lambda, nu, sigma]]);
            }
        }
        g
    })
}

fn rms(m: &DMatrix<f64>) -> f64 {
    if m.is_empty() {
        return 0.0;
    }
    (m.norm_squared() / m.len() as f64).sqrt()
}

/// Pulay's direct inversion in the iterative subspace.
struct Diis {
    size: usize,
    focks: VecDeque<DMatrix<f64>>,
    errors: VecDeque<DMatrix<f64>>,
}

impl Diis {
    fn new(size: usize) -> Self {
        Self {
            size,
            focks: VecDeque::with_capacity(size),
            errors: VecDeque::with_capacity(size),
        }
    }

    fn push(&mut self, fock: DMatrix<f64>, error: DMatrix<f64>) {
        if self.focks.len() == self.size {
            self.focks.pop_front();
            self.errors.pop_front();
        }
        self.focks.push_back(fock);
        self.errors.push_back(error);
    }

    /// `None` until two vectors are stored, once the error has vanished, or
    /// when the B matrix is singular.
    fn extrapolate(&self) -> Option<DMatrix<f64>> {
        let m = self.focks.len();
        if m < 2 || self.errors[m - 1].amax() < DIIS_MIN_ERROR {
            return None;
        }
        let mut b = DMatrix::from_element(m + 1, m + 1, -1.0);
        b[(m, m)] = 0.0;
        for i in 0..m {
            for j in 0..=i {
                let value = self.errors[i].dot(&self.errors[j]);
                b[(i, j)] = value;
                b[(j, i)] = value;
            }
        }
        let mut rhs = DVector::zeros(m + 1);
        rhs[m] = -1.0;
        let weights = b.lu().solve(&rhs)?;
        if weights.iter().any(|w| !w.is_finite()) {
            return None;
        }
        let mut fock = DMatrix::zeros(self.focks[0].nrows(), self.focks[0].ncols());
        for (w, f) in weights.iter().zip(&self.focks) {
            fock += f * *w;
        }
        Some(fock)
    }
}
