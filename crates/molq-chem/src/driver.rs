//! Geometry and basis in, MO-basis problem out.

use nalgebra::DMatrix;
use ndarray::Array4;
use tracing::info;

use crate::basis::BasisSet;
use crate::error::{ChemError, ChemResult};
use crate::integrals::AoIntegrals;
use crate::molecule::{DistanceUnit, Molecule};
use crate::problem::{ElectronicEnergy, ElectronicStructureProblem};
use crate::scf::RestrictedHartreeFock;

/// Runs restricted Hartree-Fock on a molecule and exposes the resulting
/// MO integrals as an [`ElectronicStructureProblem`].
///
/// # Example
///
/// ```no_run
/// use molq_chem::HartreeFockDriver;
///
/// let problem = HartreeFockDriver::new("H 0 0 0; H 0 0 0.735", "sto3g")
///     .run()
///     .unwrap();
/// assert_eq!(problem.num_spatial_orbitals(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HartreeFockDriver {
    geometry: String,
    basis: String,
    unit: DistanceUnit,
    charge: i32,
    spin: u32,
    scf: RestrictedHartreeFock,
}

impl HartreeFockDriver {
    pub fn new(geometry: impl Into<String>, basis: impl Into<String>) -> Self {
        Self {
            geometry: geometry.into(),
            basis: basis.into(),
            unit: DistanceUnit::Angstrom,
            charge: 0,
            spin: 0,
            scf: RestrictedHartreeFock::default(),
        }
    }

    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }

    /// Number of unpaired electrons (2S). Only 0 can be solved.
    pub fn with_spin(mut self, spin: u32) -> Self {
        self.spin = spin;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.scf.max_iterations = max_iterations;
        self
    }

    pub fn with_convergence(mut self, energy_tolerance: f64) -> Self {
        self.scf.energy_tolerance = energy_tolerance;
        self
    }

    pub fn molecule(&self) -> ChemResult<Molecule> {
        Ok(Molecule::from_geometry(&self.geometry, self.unit)?
            .with_charge(self.charge)
            .with_spin(self.spin))
    }

    pub fn run(&self) -> ChemResult<ElectronicStructureProblem> {
        let molecule = self.molecule()?;
        let (num_alpha, num_beta) = molecule.num_alpha_beta()?;
        if num_alpha != num_beta {
            return Err(ChemError::OpenShell {
                electrons: num_alpha + num_beta,
                spin: self.spin,
            });
        }

        let basis_set: BasisSet = self.basis.parse()?;
        let basis = basis_set.build(&molecule)?;
        if num_alpha > basis.len() {
            return Err(ChemError::InvalidElectronCount {
                charge: self.charge,
                electrons: (num_alpha + num_beta) as i64,
            });
        }
        info!(
            atoms = molecule.atoms().len(),
            basis = %basis_set,
            functions = basis.len(),
            electrons = num_alpha + num_beta,
            "building integrals"
        );

        let ints = AoIntegrals::compute(&basis, &molecule);
        let scf = self.scf.solve(&ints, num_alpha)?;
        let nuclear_repulsion = molecule.nuclear_repulsion();
        let hf_energy = scf.electronic_energy + nuclear_repulsion;
        info!(
            hf_energy,
            nuclear_repulsion,
            iterations = scf.iterations,
            "Hartree-Fock reference"
        );

        let (one_body, two_body) =
            mo_integrals(&ints.core_hamiltonian(), &ints.eri, &scf.mo_coefficients);

        Ok(ElectronicStructureProblem {
            hamiltonian: ElectronicEnergy::new(one_body, two_body, nuclear_repulsion),
            num_alpha,
            num_beta,
            reference_energy: Some(hf_energy),
            orbital_energies: scf.orbital_energies.iter().copied().collect(),
        })
    }
}

/// Transform AO integrals into the orbital basis given by the columns of
/// `coefficients`.
pub fn mo_integrals(
    core_hamiltonian: &DMatrix<f64>,
    eri: &Array4<f64>,
    coefficients: &DMatrix<f64>,
) -> (DMatrix<f64>, Array4<f64>) {
    let one_body = coefficients.transpose() * core_hamiltonian * coefficients;
    let mut two_body = eri.clone();
    for _ in 0..4 {
        two_body = transform_leading_index(&two_body, coefficients);
    }
    (one_body, two_body)
}

/// `out[b, c, d, p] = Σ_a C[a, p] t[a, b, c, d]`. Four applications
/// transform every index and restore the original index order.
fn transform_leading_index(t: &Array4<f64>, c: &DMatrix<f64>) -> Array4<f64> {
    let (n_ao, n_b, n_c, n_d) = t.dim();
    let n_mo = c.ncols();
    let mut out = Array4::zeros((n_b, n_c, n_d, n_mo));
    for a in 0..n_ao {
        for p in 0..n_mo {
            let cap = c[(a, p)];
            if cap == 0.0 {
                continue;
            }
            for b in 0..n_b {
                for cc in 0..n_c {
                    for d in 0..n_d {
                        out[[b, cc, d, p]] += cap * t[[a, b, cc, d]];
                    }
                }
            }
        }
    }
    out
}
