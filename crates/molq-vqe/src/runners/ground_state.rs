//! Ground-state energies of electronic-structure problems.

use molq_chem::{ElectronicStructureProblem, ElectronicStructureResult, QubitMapper};
use molq_ops::PauliHamiltonian;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{MinimumEigensolver, VqeResult};
use crate::error::Result;

/// Maps a problem to qubits and hands the operator to a
/// [`MinimumEigensolver`].
#[derive(Debug)]
pub struct GroundStateEigensolver<M: QubitMapper, S: MinimumEigensolver> {
    mapper: M,
    solver: S,
}

/// Energies of a ground-state calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundStateResult {
    /// Eigenvalue split into its electronic, shift and nuclear parts.
    pub energies: ElectronicStructureResult,
    pub num_qubits: usize,
    pub num_pauli_terms: usize,
    pub solver: String,
    pub vqe: Option<VqeResult>,
}

impl GroundStateResult {
    /// Raw eigenvalue of the qubit operator.
    pub fn eigenvalue(&self) -> f64 {
        self.energies.computed_energies.first().copied().unwrap_or(0.0)
    }

    /// Electronic energy including active-space shifts.
    pub fn electronic_energy(&self) -> f64 {
        self.energies.electronic_energies().first().copied().unwrap_or(0.0)
    }

    /// Electronic energy plus nuclear repulsion.
    pub fn total_energy(&self) -> f64 {
        self.energies.total_energies().first().copied().unwrap_or(0.0)
    }
}

impl<M: QubitMapper, S: MinimumEigensolver> GroundStateEigensolver<M, S> {
    pub fn new(mapper: M, solver: S) -> Self {
        Self { mapper, solver }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    /// The qubit Hamiltonian the solver sees.
    pub fn qubit_operator(&self, problem: &ElectronicStructureProblem) -> Result<PauliHamiltonian> {
        let fermionic = problem.second_q_op()?;
        let operator = self.mapper.map(&fermionic)?;
        info!(
            mapper = self.mapper.name(),
            qubits = operator.num_qubits(),
            terms = operator.num_terms(),
            "qubit Hamiltonian"
        );
        Ok(operator)
    }

    pub fn solve(&mut self, problem: &ElectronicStructureProblem) -> Result<GroundStateResult> {
        let operator = self.qubit_operator(problem)?;
        let outcome = self.solver.compute_minimum_eigenvalue(&operator)?;
        let result = GroundStateResult {
            energies: problem.interpret(&[outcome.eigenvalue]),
            num_qubits: operator.num_qubits(),
            num_pauli_terms: operator.num_terms(),
            solver: self.solver.name().to_string(),
            vqe: outcome.vqe,
        };
        info!(
            solver = self.solver.name(),
            eigenvalue = outcome.eigenvalue,
            total_energy = result.total_energy(),
            "ground state"
        );
        Ok(result)
    }
}
