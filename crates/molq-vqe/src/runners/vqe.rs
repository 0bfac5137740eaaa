//! VQE (Variational Quantum Eigensolver) runner.
//!
//! VQE is a hybrid classical-quantum algorithm for finding ground state
//! energies: a classical optimizer proposes ansatz parameters, an estimator
//! returns the energy of the bound circuit.

use molq_adapter_sim::Estimator;
use molq_ops::PauliHamiltonian;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use tracing::{debug, info, warn};

use super::{MinimumEigensolver, MinimumEigensolverResult};
use crate::circuits::TwoLocal;
use crate::error::{Result, VqeError};
use crate::optimizers::{Cobyla, Optimizer};

/// Seed of the random initial point when none is given.
pub const DEFAULT_SEED: u64 = 30;

/// Result of a VQE run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqeResult {
    /// Lowest energy found.
    pub optimal_energy: f64,
    /// Parameters of the lowest energy.
    pub optimal_params: Vec<f64>,
    /// Parameters the optimizer started from.
    pub initial_params: Vec<f64>,
    /// Number of optimizer iterations.
    pub iterations: usize,
    /// Number of circuit evaluations.
    pub circuit_evaluations: usize,
    /// Energy of every evaluation, in order.
    pub energy_history: Vec<f64>,
    /// Whether the optimizer met its stopping criterion.
    pub converged: bool,
    pub optimizer: String,
}

/// Where the optimizer starts.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialPoint {
    Explicit(Vec<f64>),
    /// Uniform in `[-2π, 2π)` from a seeded generator.
    Random { seed: u64 },
}

impl InitialPoint {
    pub fn resolve(&self, num_parameters: usize) -> Result<Vec<f64>> {
        match self {
            InitialPoint::Explicit(point) if point.len() != num_parameters => {
                Err(VqeError::ParameterMismatch {
                    expected: num_parameters,
                    got: point.len(),
                })
            }
            InitialPoint::Explicit(point) => Ok(point.clone()),
            InitialPoint::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok((0..num_parameters)
                    .map(|_| rng.gen_range(-2.0 * PI..2.0 * PI))
                    .collect())
            }
        }
    }
}

type Callback = Box<dyn FnMut(usize, &[f64], f64)>;

/// Couples an estimator, an ansatz and an optimizer.
///
/// # Example
///
/// ```
/// use molq_adapter_sim::StatevectorEstimator;
/// use molq_ops::{PauliHamiltonian, PauliTerm};
/// use molq_vqe::circuits::{EntanglementGate, RotationGate, TwoLocal};
/// use molq_vqe::optimizers::Cobyla;
/// use molq_vqe::runners::Vqe;
///
/// // H = Z0 + Z1, ground energy -2
/// let h = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0), PauliTerm::z(1.0, 1)]);
/// let ansatz = TwoLocal::new(2, vec![RotationGate::Ry], vec![EntanglementGate::Cz])
///     .unwrap()
///     .with_reps(1);
/// let mut vqe = Vqe::new(StatevectorEstimator::new(), ansatz, Cobyla::new())
///     .with_initial_point(vec![0.5, -0.5, 0.5, 0.5]);
/// let result = vqe.run(&h).unwrap();
/// assert!((result.optimal_energy + 2.0).abs() < 1e-6);
/// ```
pub struct Vqe<E: Estimator> {
    estimator: E,
    ansatz: TwoLocal,
    optimizer: Box<dyn Optimizer>,
    initial_point: InitialPoint,
    callback: Option<Callback>,
}

impl<E: Estimator> Vqe<E> {
    pub fn new(estimator: E, ansatz: TwoLocal, optimizer: impl Optimizer + 'static) -> Self {
        Self {
            estimator,
            ansatz,
            optimizer: Box::new(optimizer),
            initial_point: InitialPoint::Random { seed: DEFAULT_SEED },
            callback: None,
        }
    }

    /// Same, with a COBYLA optimizer at its defaults.
    pub fn with_cobyla(estimator: E, ansatz: TwoLocal) -> Self {
        Self::new(estimator, ansatz, Cobyla::default())
    }

    pub fn with_initial_point(mut self, point: Vec<f64>) -> Self {
        self.initial_point = InitialPoint::Explicit(point);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.initial_point = InitialPoint::Random { seed };
        self
    }

    /// Called after every evaluation with (evaluation count, parameters,
    /// energy).
    pub fn with_callback(mut self, callback: impl FnMut(usize, &[f64], f64) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn ansatz(&self) -> &TwoLocal {
        &self.ansatz
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn num_parameters(&self) -> usize {
        self.ansatz.num_parameters()
    }

    /// Minimize the energy of `hamiltonian` over the ansatz parameters.
    pub fn run(&mut self, hamiltonian: &PauliHamiltonian) -> Result<VqeResult> {
        if hamiltonian.num_qubits() > self.ansatz.num_qubits() {
            return Err(VqeError::InvalidAnsatz(format!(
                "{}-qubit ansatz for a {}-qubit operator",
                self.ansatz.num_qubits(),
                hamiltonian.num_qubits()
            )));
        }
        let initial_params = self.initial_point.resolve(self.ansatz.num_parameters())?;
        info!(
            qubits = self.ansatz.num_qubits(),
            parameters = initial_params.len(),
            optimizer = self.optimizer.name(),
            estimator = self.estimator.name(),
            "starting VQE"
        );

        let ansatz = &self.ansatz;
        let estimator = &mut self.estimator;
        let callback = &mut self.callback;
        let mut evaluations = 0;
        let mut objective = |params: &[f64]| -> Result<f64> {
            let circuit = ansatz.bind(params)?;
            let energy = estimator.estimate(&circuit, hamiltonian)?;
            evaluations += 1;
            debug!(evaluation = evaluations, energy, "VQE evaluation");
            if let Some(callback) = callback.as_mut() {
                callback(evaluations, params, energy);
            }
            Ok(energy)
        };

        let outcome = self.optimizer.minimize(&mut objective, initial_params.clone())?;
        if !outcome.converged {
            warn!(
                evaluations = outcome.num_evaluations,
                energy = outcome.optimal_value,
                "optimizer stopped before converging"
            );
        }
        info!(
            energy = outcome.optimal_value,
            evaluations = outcome.num_evaluations,
            converged = outcome.converged,
            "VQE finished"
        );

        Ok(VqeResult {
            optimal_energy: outcome.optimal_value,
            optimal_params: outcome.optimal_params,
            initial_params,
            iterations: outcome.num_iterations,
            circuit_evaluations: outcome.num_evaluations,
            energy_history: outcome.history,
            converged: outcome.converged,
            optimizer: self.optimizer.name().to_string(),
        })
    }
}

impl<E: Estimator> MinimumEigensolver for Vqe<E> {
    fn name(&self) -> &'static str {
        "vqe"
    }

    fn compute_minimum_eigenvalue(
        &mut self,
        operator: &PauliHamiltonian,
    ) -> Result<MinimumEigensolverResult> {
        let result = self.run(operator)?;
        Ok(MinimumEigensolverResult {
            eigenvalue: result.optimal_energy,
            vqe: Some(result),
        })
    }
}

impl<E: Estimator> fmt::Debug for Vqe<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vqe")
            .field("estimator", &self.estimator.name())
            .field("ansatz", &self.ansatz)
            .field("optimizer", &self.optimizer.name())
            .field("initial_point", &self.initial_point)
            .finish()
    }
}
