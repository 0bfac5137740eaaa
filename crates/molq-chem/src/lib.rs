//! Electronic-structure side of the molq pipeline.
//!
//! 1. [`HartreeFockDriver`] turns a geometry string and a basis name into an
//!    [`ElectronicStructureProblem`] (MO-basis integrals from restricted
//!    Hartree-Fock).
//! 2. [`ActiveSpaceTransformer`] reduces the problem to an active
//!    electron/orbital subset, folding the frozen core into an energy shift.
//! 3. [`ElectronicEnergy::second_q_op`] produces the [`FermionicOp`], which a
//!    [`QubitMapper`] turns into a `PauliHamiltonian`.

pub mod basis;
pub mod driver;
pub mod element;
pub mod error;
pub mod fermionic;
pub mod integrals;
pub mod mappers;
pub mod molecule;
pub mod problem;
pub mod scf;
pub mod transformers;

pub use basis::{BasisFunction, BasisSet};
pub use driver::HartreeFockDriver;
pub use element::Element;
pub use error::{ChemError, ChemResult};
pub use fermionic::{FermionicOp, LadderOp};
pub use integrals::AoIntegrals;
pub use mappers::{JordanWignerMapper, MapperKind, ParityMapper, QubitMapper};
pub use molecule::{Atom, DistanceUnit, Molecule};
pub use problem::{ElectronicEnergy, ElectronicStructureProblem, ElectronicStructureResult};
pub use scf::{RestrictedHartreeFock, ScfSolution};
pub use transformers::{ACTIVE_SPACE_SHIFT, ActiveSpaceTransformer};
