//! The end-to-end ground-state pipeline and its configuration.
//!
//! molecule -> Hartree-Fock problem -> active space -> qubit operator ->
//! two-local ansatz -> VQE.
//!
//! Every section has defaults, so a configuration file only lists what it
//! changes:
//!
//! ```yaml
//! molecule:
//!   geometry: "H 0 0 0; H 0 0 0.74"
//! optimizer:
//!   name: lbfgs
//! ```

use molq_adapter_sim::{Estimator, ShotEstimator, StatevectorEstimator};
use molq_chem::{
    ActiveSpaceTransformer, DistanceUnit, ElectronicStructureProblem, HartreeFockDriver,
    JordanWignerMapper, MapperKind,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::circuits::{
    hartree_fock_state, Entanglement, EntanglementGate, RotationGate, TwoLocal,
};
use crate::error::{Result, VqeError};
use crate::optimizers::OptimizerConfig;
use crate::runners::{
    DEFAULT_SEED, ExactEigensolver, GroundStateEigensolver, GroundStateResult, Vqe,
};

/// Geometry and electronic-structure settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculeConfig {
    /// Atoms as `Symbol x y z`, separated by `;` or newlines.
    pub geometry: String,
    pub basis: String,
    pub unit: DistanceUnit,
    pub charge: i32,
    /// Number of unpaired electrons.
    pub spin: u32,
}

impl Default for MoleculeConfig {
    fn default() -> Self {
        Self {
            geometry: "H 0 0 0; H 0 0 0.735".to_string(),
            basis: "sto3g".to_string(),
            unit: DistanceUnit::Angstrom,
            charge: 0,
            spin: 0,
        }
    }
}

/// Active electrons and orbitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveSpaceConfig {
    pub num_electrons: usize,
    pub num_spatial_orbitals: usize,
    /// Explicit orbital indices instead of the ones above the core.
    pub active_orbitals: Option<Vec<usize>>,
}

impl Default for ActiveSpaceConfig {
    fn default() -> Self {
        Self {
            num_electrons: 2,
            num_spatial_orbitals: 2,
            active_orbitals: None,
        }
    }
}

impl ActiveSpaceConfig {
    pub fn transformer(&self) -> ActiveSpaceTransformer {
        let transformer = ActiveSpaceTransformer::new(self.num_electrons, self.num_spatial_orbitals);
        match &self.active_orbitals {
            Some(orbitals) => transformer.with_active_orbitals(orbitals.clone()),
            None => transformer,
        }
    }
}

/// State the ansatz starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    /// `|0…0⟩`.
    #[default]
    Zero,
    HartreeFock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnsatzConfig {
    pub rotation_blocks: Vec<RotationGate>,
    pub entanglement_blocks: Vec<EntanglementGate>,
    pub entanglement: Entanglement,
    pub reps: usize,
    pub skip_final_rotation_layer: bool,
    pub initial_state: InitialState,
}

impl Default for AnsatzConfig {
    fn default() -> Self {
        Self {
            rotation_blocks: vec![RotationGate::Ry],
            entanglement_blocks: vec![EntanglementGate::Cz],
            entanglement: Entanglement::Full,
            reps: 3,
            skip_final_rotation_layer: false,
            initial_state: InitialState::Zero,
        }
    }
}

impl AnsatzConfig {
    /// The ansatz for `problem` encoded with `mapper`.
    pub fn build(&self, problem: &ElectronicStructureProblem, mapper: MapperKind) -> Result<TwoLocal> {
        let ansatz = TwoLocal::new(
            problem.num_spin_orbitals(),
            self.rotation_blocks.clone(),
            self.entanglement_blocks.clone(),
        )?
        .with_reps(self.reps)
        .with_entanglement(self.entanglement)
        .with_skip_final_rotation_layer(self.skip_final_rotation_layer);
        match self.initial_state {
            InitialState::Zero => Ok(ansatz),
            InitialState::HartreeFock => ansatz.with_initial_state(hartree_fock_state(
                problem.num_spatial_orbitals(),
                problem.num_particles(),
                mapper,
            )?),
        }
    }
}

/// Expectation values: exact, or sampled with a fixed number of shots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub shots: Option<u32>,
}

impl EstimatorConfig {
    /// Shot sampling is seeded from the pipeline seed.
    pub fn build(&self, seed: u64) -> Result<Box<dyn Estimator>> {
        let estimator: Box<dyn Estimator> = match self.shots {
            None => Box::new(StatevectorEstimator::new()),
            Some(shots) => Box::new(ShotEstimator::new(shots, seed)?),
        };
        Ok(estimator)
    }
}

/// Everything the pipeline needs. [`Default`] is the H2/STO-3G reference
/// run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub molecule: MoleculeConfig,
    /// `None` keeps the full problem.
    pub active_space: Option<ActiveSpaceConfig>,
    pub mapper: MapperKind,
    pub ansatz: AnsatzConfig,
    pub optimizer: OptimizerConfig,
    pub estimator: EstimatorConfig,
    /// Seeds the initial point and shot sampling.
    pub seed: u64,
    /// Also diagonalize the qubit operator for a reference energy.
    pub exact_reference: bool,
    pub scf_max_iterations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            molecule: MoleculeConfig::default(),
            active_space: Some(ActiveSpaceConfig::default()),
            mapper: MapperKind::JordanWigner,
            ansatz: AnsatzConfig::default(),
            optimizer: OptimizerConfig::default(),
            estimator: EstimatorConfig::default(),
            seed: DEFAULT_SEED,
            exact_reference: false,
            scf_max_iterations: 100,
        }
    }
}

impl PipelineConfig {
    pub fn driver(&self) -> HartreeFockDriver {
        HartreeFockDriver::new(&self.molecule.geometry, &self.molecule.basis)
            .with_unit(self.molecule.unit)
            .with_charge(self.molecule.charge)
            .with_spin(self.molecule.spin)
            .with_max_iterations(self.scf_max_iterations)
    }

    /// Stages 1 and 2: the (reduced) electronic-structure problem.
    pub fn problem(&self) -> Result<ElectronicStructureProblem> {
        let problem = self.driver().run()?;
        let Some(active) = &self.active_space else {
            return Ok(problem);
        };
        Ok(active.transformer().transform(&problem)?)
    }
}

/// Result of [`run_pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub ground_state: GroundStateResult,
    pub num_parameters: usize,
    /// Total energy from exact diagonalization, when requested.
    pub exact_energy: Option<f64>,
}

impl PipelineReport {
    /// Total ground-state energy estimate in Hartree.
    pub fn total_energy(&self) -> f64 {
        self.ground_state.total_energy()
    }
}

/// Run all five stages.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    if config.ansatz.reps == 0 && config.ansatz.skip_final_rotation_layer {
        return Err(VqeError::InvalidConfig("the ansatz has no parameters".into()));
    }

    let problem = config.problem()?;
    info!(
        spatial_orbitals = problem.num_spatial_orbitals(),
        alpha = problem.num_alpha,
        beta = problem.num_beta,
        shift = problem.energy_shift(),
        "electronic-structure problem"
    );

    let ansatz = config.ansatz.build(&problem, config.mapper)?;
    let num_parameters = ansatz.num_parameters();
    info!(ansatz = %ansatz, parameters = num_parameters, "ansatz");

    let estimator = config.estimator.build(config.seed)?;
    let vqe = Vqe::new(estimator, ansatz, config.optimizer.build()).with_seed(config.seed);
    let mut solver = GroundStateEigensolver::new(config.mapper.mapper(), vqe);
    let ground_state = solver.solve(&problem)?;

    let exact_energy = if config.exact_reference {
        let mut exact = GroundStateEigensolver::new(
            JordanWignerMapper,
            ExactEigensolver::new()
                .with_particle_sector(problem.num_spatial_orbitals(), problem.num_particles()),
        );
        let reference = exact.solve(&problem)?;
        info!(
            exact = reference.total_energy(),
            error = ground_state.total_energy() - reference.total_energy(),
            "exact reference"
        );
        Some(reference.total_energy())
    } else {
        None
    };

    Ok(PipelineReport {
        ground_state,
        num_parameters,
        exact_energy,
    })
}
