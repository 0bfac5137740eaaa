//! Electronic-structure problems in the molecular-orbital basis.

use nalgebra::DMatrix;
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ChemResult;
use crate::fermionic::{FermionicOp, LadderOp};

/// Integrals smaller than this do not produce fermionic terms.
const INTEGRAL_CUTOFF: f64 = 1e-12;

/// Electronic Hamiltonian
/// `H = Σ h_pq a†_pσ a_qσ + ½ Σ (pq|rs) a†_pσ a†_rτ a_sτ a_qσ`
/// plus constant shifts that are reported separately from the eigenvalue.
#[derive(Debug, Clone)]
pub struct ElectronicEnergy {
    /// `h_pq` over spatial orbitals.
    pub one_body: DMatrix<f64>,
    /// `(pq|rs)` in chemists' notation.
    pub two_body: Array4<f64>,
    pub nuclear_repulsion_energy: f64,
    /// Named constant energies, e.g. the frozen-core energy of an active
    /// space.
    pub constants: BTreeMap<String, f64>,
}

impl ElectronicEnergy {
    pub fn new(one_body: DMatrix<f64>, two_body: Array4<f64>, nuclear_repulsion_energy: f64) -> Self {
        Self {
            one_body,
            two_body,
            nuclear_repulsion_energy,
            constants: BTreeMap::new(),
        }
    }

    pub fn num_spatial_orbitals(&self) -> usize {
        self.one_body.nrows()
    }

    /// Second-quantized operator over `2n` spin orbitals, alpha block first.
    pub fn second_q_op(&self) -> ChemResult<FermionicOp> {
        let n = self.num_spatial_orbitals();
        let mut op = FermionicOp::new(2 * n);

        for spin in 0..2 {
            let offset = spin * n;
            for p in 0..n {
                for q in 0..n {
                    let h = self.one_body[(p, q)];
                    if h.abs() > INTEGRAL_CUTOFF {
                        op.add_term(
                            vec![LadderOp::Create(p + offset), LadderOp::Annihilate(q + offset)],
                            h,
                        )?;
                    }
                }
            }
        }

        for sigma in 0..2 {
            for tau in 0..2 {
                for p in 0..n {
                    for q in 0..n {
                        for r in 0..n {
                            for s in 0..n {
                                let (ps, qs) = (p + sigma * n, q + sigma * n);
                                let (rt, st) = (r + tau * n, s + tau * n);
                                if ps == rt || qs == st {
                                    continue;
                                }
                                let g = self.two_body[[p, q, r, s]];
                                if g.abs() <= INTEGRAL_CUTOFF {
                                    continue;
                                }
                                op.add_term(
                                    vec![
                                        LadderOp::Create(ps),
                                        LadderOp::Create(rt),
                                        LadderOp::Annihilate(st),
                                        LadderOp::Annihilate(qs),
                                    ],
                                    0.5 * g,
                                )?;
                            }
                        }
                    }
                }
            }
        }
        Ok(op)
    }
}

/// A problem ready for qubit mapping.
#[derive(Debug, Clone)]
pub struct ElectronicStructureProblem {
    pub hamiltonian: ElectronicEnergy,
    pub num_alpha: usize,
    pub num_beta: usize,
    /// Hartree-Fock total energy of the full system, when known.
    pub reference_energy: Option<f64>,
    /// Orbital energies of the orbitals the problem is expressed in.
    pub orbital_energies: Vec<f64>,
}

impl ElectronicStructureProblem {
    pub fn num_spatial_orbitals(&self) -> usize {
        self.hamiltonian.num_spatial_orbitals()
    }

    pub fn num_spin_orbitals(&self) -> usize {
        2 * self.num_spatial_orbitals()
    }

    pub fn num_particles(&self) -> (usize, usize) {
        (self.num_alpha, self.num_beta)
    }

    pub fn second_q_op(&self) -> ChemResult<FermionicOp> {
        self.hamiltonian.second_q_op()
    }

    /// Sum of the recorded constant shifts.
    pub fn energy_shift(&self) -> f64 {
        self.hamiltonian.constants.values().sum()
    }

    /// Turn raw eigenvalues of the mapped operator into energies.
    pub fn interpret(&self, eigenvalues: &[f64]) -> ElectronicStructureResult {
        ElectronicStructureResult {
            computed_energies: eigenvalues.to_vec(),
            nuclear_repulsion_energy: self.hamiltonian.nuclear_repulsion_energy,
            extracted_transformer_energies: self.hamiltonian.constants.clone(),
            hartree_fock_energy: self.reference_energy,
        }
    }
}

/// Energies split into their sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectronicStructureResult {
    /// Eigenvalues of the qubit Hamiltonian.
    pub computed_energies: Vec<f64>,
    pub nuclear_repulsion_energy: f64,
    pub extracted_transformer_energies: BTreeMap<String, f64>,
    pub hartree_fock_energy: Option<f64>,
}

impl ElectronicStructureResult {
    /// Electronic energies including the transformer shifts.
    pub fn electronic_energies(&self) -> Vec<f64> {
        let shift: f64 = self.extracted_transformer_energies.values().sum();
        self.computed_energies.iter().map(|e| e + shift).collect()
    }

    /// Electronic plus nuclear repulsion energies.
    pub fn total_energies(&self) -> Vec<f64> {
        self.electronic_energies()
            .into_iter()
            .map(|e| e + self.nuclear_repulsion_energy)
            .collect()
    }
}
