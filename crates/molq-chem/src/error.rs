//! Error types for the electronic-structure stages.

use molq_ops::OpsError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChemError {
    #[error("geometry is empty")]
    EmptyGeometry,

    #[error("malformed atom specification {spec:?}: {reason}")]
    MalformedGeometry { spec: String, reason: String },

    #[error("unknown element {0:?}")]
    UnknownElement(String),

    #[error("unknown distance unit {0:?}")]
    UnknownUnit(String),

    #[error("unknown basis set {0:?}")]
    UnknownBasis(String),

    #[error("basis {basis} has no functions for {element}")]
    MissingBasisFunctions { basis: String, element: String },

    #[error("molecule with charge {charge} has {electrons} electrons")]
    InvalidElectronCount { charge: i32, electrons: i64 },

    #[error("open-shell systems are not supported ({electrons} electrons, spin {spin})")]
    OpenShell { electrons: usize, spin: u32 },

    #[error("overlap matrix is singular (smallest eigenvalue {min_eigenvalue:e})")]
    SingularOverlap { min_eigenvalue: f64 },

    #[error("SCF did not converge in {iterations} iterations (last energy change {delta_energy:e})")]
    ScfNotConverged { iterations: usize, delta_energy: f64 },

    #[error("active space requests {requested} electrons but the problem has {available}")]
    TooManyActiveElectrons { requested: usize, available: usize },

    #[error(
        "active space needs {requested} orbitals ({inactive} inactive + {active} active) but the problem has {available}"
    )]
    TooManyActiveOrbitals {
        requested: usize,
        inactive: usize,
        active: usize,
        available: usize,
    },

    #[error("{electrons} active electrons do not fit in {orbitals} active orbitals")]
    ActiveElectronsExceedCapacity { electrons: usize, orbitals: usize },

    #[error("{inactive} inactive electrons cannot be split into doubly occupied orbitals")]
    OddInactiveElectrons { inactive: usize },

    #[error("invalid active orbital selection: {0}")]
    InvalidActiveOrbitals(String),

    #[error("fermionic mode {mode} is out of range for {num_modes} modes")]
    ModeOutOfRange { mode: usize, num_modes: usize },

    #[error(transparent)]
    Ops(#[from] OpsError),
}

pub type ChemResult<T> = Result<T, ChemError>;
