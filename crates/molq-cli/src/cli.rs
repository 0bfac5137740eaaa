use clap::Parser;
use molq_chem::{DistanceUnit, MapperKind};
use molq_vqe::{Entanglement, OptimizerConfig};
use std::path::PathBuf;

/// Estimate molecular ground-state energies with VQE.
///
/// Without arguments, runs H2 in STO-3G at 0.735 Å.
#[derive(Parser, Debug)]
#[command(name = "molq", version)]
pub struct Cli {
    /// YAML or JSON pipeline configuration
    #[arg(short, long, value_name = "PATH", env = "MOLQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Atoms as "Symbol x y z", separated by ';'
    #[arg(long, env = "MOLQ_GEOMETRY")]
    pub geometry: Option<String>,

    /// Basis set name
    #[arg(long, env = "MOLQ_BASIS")]
    pub basis: Option<String>,

    /// Unit of the geometry coordinates (angstrom, bohr)
    #[arg(long, env = "MOLQ_UNIT")]
    pub unit: Option<DistanceUnit>,

    #[arg(long, env = "MOLQ_CHARGE", allow_negative_numbers = true)]
    pub charge: Option<i32>,

    /// Number of unpaired electrons
    #[arg(long, env = "MOLQ_SPIN")]
    pub spin: Option<u32>,

    /// Electrons in the active space
    #[arg(long, env = "MOLQ_ACTIVE_ELECTRONS")]
    pub active_electrons: Option<usize>,

    /// Spatial orbitals in the active space
    #[arg(long, env = "MOLQ_ACTIVE_ORBITALS")]
    pub active_orbitals: Option<usize>,

    /// Keep every orbital
    #[arg(long, conflicts_with_all = ["active_electrons", "active_orbitals"])]
    pub no_active_space: bool,

    /// Fermion-to-qubit mapping (jordan_wigner, parity)
    #[arg(long, env = "MOLQ_MAPPER")]
    pub mapper: Option<MapperKind>,

    /// Classical optimizer (cobyla, nelder_mead, lbfgs)
    #[arg(long, env = "MOLQ_OPTIMIZER")]
    pub optimizer: Option<OptimizerConfig>,

    /// Optimizer budget
    #[arg(long, env = "MOLQ_MAXITER")]
    pub maxiter: Option<usize>,

    /// Ansatz repetitions
    #[arg(long, env = "MOLQ_REPS")]
    pub reps: Option<usize>,

    /// Entangler layout (full, linear, reverse_linear, circular)
    #[arg(long, env = "MOLQ_ENTANGLEMENT")]
    pub entanglement: Option<Entanglement>,

    /// Sample expectation values with this many shots per term
    #[arg(long, env = "MOLQ_SHOTS")]
    pub shots: Option<u32>,

    /// Seed of the initial point and shot sampling
    #[arg(long, env = "MOLQ_SEED")]
    pub seed: Option<u64>,

    /// Also report the exact ground-state energy
    #[arg(long)]
    pub exact: bool,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
