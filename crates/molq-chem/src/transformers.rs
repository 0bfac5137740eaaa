//! Active-space reduction.

use nalgebra::DMatrix;
use ndarray::Array4;
use tracing::info;

use crate::error::{ChemError, ChemResult};
use crate::problem::{ElectronicEnergy, ElectronicStructureProblem};

/// Key under which the frozen-core energy is recorded.
pub const ACTIVE_SPACE_SHIFT: &str = "ActiveSpaceTransformer";

/// Restricts a problem to `num_electrons` electrons in `num_spatial_orbitals`
/// orbitals. The remaining electrons doubly occupy the lowest orbitals and
/// enter only through an effective one-body operator and a constant shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSpaceTransformer {
    num_electrons: usize,
    num_spatial_orbitals: usize,
    active_orbitals: Option<Vec<usize>>,
}

impl ActiveSpaceTransformer {
    pub fn new(num_electrons: usize, num_spatial_orbitals: usize) -> Self {
        Self {
            num_electrons,
            num_spatial_orbitals,
            active_orbitals: None,
        }
    }

    /// Pick the active orbitals explicitly instead of the ones just above
    /// the inactive block.
    pub fn with_active_orbitals(mut self, orbitals: Vec<usize>) -> Self {
        self.active_orbitals = Some(orbitals);
        self
    }

    pub fn num_electrons(&self) -> usize {
        self.num_electrons
    }

    pub fn num_spatial_orbitals(&self) -> usize {
        self.num_spatial_orbitals
    }

    pub fn transform(&self, problem: &ElectronicStructureProblem) -> ChemResult<ElectronicStructureProblem> {
        let available = problem.num_spatial_orbitals();
        let (num_alpha, num_beta) = problem.num_particles();
        let total = num_alpha + num_beta;

        if self.num_electrons > total {
            return Err(ChemError::TooManyActiveElectrons {
                requested: self.num_electrons,
                available: total,
            });
        }
        if self.num_electrons > 2 * self.num_spatial_orbitals {
            return Err(ChemError::ActiveElectronsExceedCapacity {
                electrons: self.num_electrons,
                orbitals: self.num_spatial_orbitals,
            });
        }
        let inactive_electrons = total - self.num_electrons;
        if inactive_electrons % 2 != 0 {
            return Err(ChemError::OddInactiveElectrons {
                inactive: inactive_electrons,
            });
        }
        let num_inactive = inactive_electrons / 2;
        if num_inactive + self.num_spatial_orbitals > available {
            return Err(ChemError::TooManyActiveOrbitals {
                requested: num_inactive + self.num_spatial_orbitals,
                inactive: num_inactive,
                active: self.num_spatial_orbitals,
                available,
            });
        }

        let (inactive, active) = self.partition(num_inactive, available)?;
        let unpaired = num_alpha.abs_diff(num_beta);
        let active_beta = self.num_electrons.saturating_sub(unpaired) / 2;
        let active_alpha = self.num_electrons - active_beta;

        let h = &problem.hamiltonian.one_body;
        let eri = &problem.hamiltonian.two_body;
        let fock = inactive_fock(h, eri, &inactive);
        let core_energy: f64 = inactive.iter().map(|&i| h[(i, i)] + fock[(i, i)]).sum();

        let n = active.len();
        let one_body = DMatrix::from_fn(n, n, |p, q| fock[(active[p], active[q])]);
        let two_body = Array4::from_shape_fn((n, n, n, n), |(p, q, r, s)| {
            eri[[active[p], active[q], active[r], active[s]]]
        });

        let mut hamiltonian = ElectronicEnergy::new(
            one_body,
            two_body,
            problem.hamiltonian.nuclear_repulsion_energy,
        );
        hamiltonian.constants = problem.hamiltonian.constants.clone();
        hamiltonian
            .constants
            .insert(ACTIVE_SPACE_SHIFT.to_string(), core_energy);

        info!(
            inactive = inactive.len(),
            active = n,
            active_electrons = self.num_electrons,
            core_energy,
            "active space"
        );

        Ok(ElectronicStructureProblem {
            hamiltonian,
            num_alpha: active_alpha,
            num_beta: active_beta,
            reference_energy: problem.reference_energy,
            orbital_energies: active
                .iter()
                .filter_map(|&i| problem.orbital_energies.get(i).copied())
                .collect(),
        })
    }

    /// Split orbital indices into (inactive, active).
    fn partition(&self, num_inactive: usize, available: usize) -> ChemResult<(Vec<usize>, Vec<usize>)> {
        let Some(active) = &self.active_orbitals else {
            let inactive = (0..num_inactive).collect();
            let active = (num_inactive..num_inactive + self.num_spatial_orbitals).collect();
            return Ok((inactive, active));
        };

        if active.len() != self.num_spatial_orbitals {
            return Err(ChemError::InvalidActiveOrbitals(format!(
                "{} indices given for {} active orbitals",
                active.len(),
                self.num_spatial_orbitals
            )));
        }
        let mut seen = vec![false; available];
        for &i in active {
            if i >= available {
                return Err(ChemError::InvalidActiveOrbitals(format!(
                    "orbital {} out of range for {} orbitals",
                    i, available
                )));
            }
            if seen[i] {
                return Err(ChemError::InvalidActiveOrbitals(format!(
                    "orbital {} listed twice",
                    i
                )));
            }
            seen[i] = true;
        }
        let inactive = (0..available)
            .filter(|i| !seen[*i])
            .take(num_inactive)
            .collect();
        Ok((inactive, active.clone()))
    }
}

/// `F_pq = h_pq + Σ_i [2 (pq|ii) - (pi|iq)]` over the inactive orbitals.
fn inactive_fock(h: &DMatrix<f64>, eri: &Array4<f64>, inactive: &[usize]) -> DMatrix<f64> {
    let n = h.nrows();
    DMatrix::from_fn(n, n, |p, q| {
        h[(p, q)]
            + inactive
                .iter()
                .map(|&i| 2.0 * eri[[p, q, i, i]] - eri[[p, i, i, q]])
                .sum::<f64>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::HartreeFockDriver;
    use approx::assert_abs_diff_eq;

    fn h2() -> ElectronicStructureProblem {
        HartreeFockDriver::new("H 0 0 0; H 0 0 0.735", "sto3g")
            .run()
            .unwrap()
    }

    fn lih() -> ElectronicStructureProblem {
        HartreeFockDriver::new("Li 0 0 0; H 0 0 1.6", "sto3g")
            .run()
            .unwrap()
    }

    #[test]
    fn test_full_active_space_is_identity() {
        let problem = h2();
        let reduced = ActiveSpaceTransformer::new(2, 2).transform(&problem).unwrap();
        assert_eq!(reduced.num_particles(), (1, 1));
        assert_eq!(reduced.hamiltonian.one_body, problem.hamiltonian.one_body);
        assert_eq!(reduced.hamiltonian.two_body, problem.hamiltonian.two_body);
        assert_eq!(reduced.hamiltonian.constants[ACTIVE_SPACE_SHIFT], 0.0);
    }

    #[test]
    fn test_core_energy_reproduces_hartree_fock() {
        // With no active electrons the frozen core is the whole HF determinant.
        let problem = lih();
        let reduced = ActiveSpaceTransformer::new(0, 0).transform(&problem).unwrap();
        let e_core = reduced.hamiltonian.constants[ACTIVE_SPACE_SHIFT];
        assert_abs_diff_eq!(
            e_core + problem.hamiltonian.nuclear_repulsion_energy,
            problem.reference_energy.unwrap(),
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_lih_frozen_core() {
        let problem = lih();
        let reduced = ActiveSpaceTransformer::new(2, 3).transform(&problem).unwrap();
        assert_eq!(reduced.num_spatial_orbitals(), 3);
        assert_eq!(reduced.num_particles(), (1, 1));
        assert_eq!(reduced.orbital_energies, problem.orbital_energies[1..4].to_vec());
        assert!(reduced.hamiltonian.constants[ACTIVE_SPACE_SHIFT] < -7.0);
    }

    #[test]
    fn test_explicit_orbitals() {
        let problem = lih();
        let reduced = ActiveSpaceTransformer::new(2, 2)
            .with_active_orbitals(vec![1, 5])
            .transform(&problem)
            .unwrap();
        assert_abs_diff_eq!(
            reduced.hamiltonian.one_body[(1, 1)],
            {
                let h = &problem.hamiltonian.one_body;
                let eri = &problem.hamiltonian.two_body;
                h[(5, 5)] + 2.0 * eri[[5, 5, 0, 0]] - eri[[5, 0, 0, 5]]
            },
            epsilon = 1e-12
        );

        let bad = ActiveSpaceTransformer::new(2, 2).with_active_orbitals(vec![1, 1]);
        assert!(matches!(
            bad.transform(&problem),
            Err(ChemError::InvalidActiveOrbitals(_))
        ));
        let bad = ActiveSpaceTransformer::new(2, 2).with_active_orbitals(vec![1, 6]);
        assert!(matches!(
            bad.transform(&problem),
            Err(ChemError::InvalidActiveOrbitals(_))
        ));
        let bad = ActiveSpaceTransformer::new(2, 2).with_active_orbitals(vec![1]);
        assert!(matches!(
            bad.transform(&problem),
            Err(ChemError::InvalidActiveOrbitals(_))
        ));
    }

    #[test]
    fn test_bounds_errors() {
        let problem = h2();
        assert!(matches!(
            ActiveSpaceTransformer::new(2, 3).transform(&problem),
            Err(ChemError::TooManyActiveOrbitals { available: 2, .. })
        ));
        assert!(matches!(
            ActiveSpaceTransformer::new(4, 2).transform(&problem),
            Err(ChemError::TooManyActiveElectrons { .. })
        ));
        assert!(matches!(
            ActiveSpaceTransformer::new(1, 2).transform(&problem),
            Err(ChemError::OddInactiveElectrons { .. })
        ));
        assert!(matches!(
            ActiveSpaceTransformer::new(2, 0).transform(&problem),
            Err(ChemError::ActiveElectronsExceedCapacity { .. })
        ));
        // LiH: one core orbital plus six active ones exceed the six available
        assert!(matches!(
            ActiveSpaceTransformer::new(2, 6).transform(&lih()),
            Err(ChemError::TooManyActiveOrbitals {
                requested: 7,
                available: 6,
                ..
            })
        ));
    }
}
