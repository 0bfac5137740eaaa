//! Variational side of the molq pipeline.
//!
//! - **Circuits**: the [`TwoLocal`] ansatz and Hartree-Fock reference states
//! - **Optimizers**: COBYLA, Nelder-Mead and L-BFGS behind [`Optimizer`]
//! - **Runners**: [`Vqe`], the dense [`ExactEigensolver`] and the
//!   [`GroundStateEigensolver`] that maps a chemistry problem to qubits
//! - **Pipeline**: [`run_pipeline`] drives all stages from a
//!   [`PipelineConfig`]
//!
//! ```no_run
//! use molq_vqe::{run_pipeline, PipelineConfig};
//!
//! // H2 at 0.735 Å in STO-3G, two electrons in two orbitals
//! let report = run_pipeline(&PipelineConfig::default()).unwrap();
//! println!("Estimated Ground State Energy: {}", report.total_energy());
//! ```

pub mod circuits;
pub mod error;
pub mod optimizers;
pub mod pipeline;
pub mod runners;

pub use circuits::{Entanglement, EntanglementGate, RotationGate, TwoLocal};
pub use error::{Result, VqeError};
pub use optimizers::{Cobyla, Lbfgs, NelderMead, OptimizationResult, Optimizer, OptimizerConfig};
pub use pipeline::{
    ActiveSpaceConfig, AnsatzConfig, EstimatorConfig, InitialState, MoleculeConfig,
    PipelineConfig, PipelineReport, run_pipeline,
};
pub use runners::{
    DEFAULT_SEED, ExactEigensolver, GroundStateEigensolver, GroundStateResult, MinimumEigensolver,
    Vqe, VqeResult,
};
