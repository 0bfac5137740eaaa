//! Fermion-to-qubit mappings.
//!
//! A mapper only has to say what a single creation operator becomes; the
//! annihilation operator is its adjoint and [`QubitMapper::map`] multiplies
//! the images term by term.

use molq_ops::{Pauli, PauliHamiltonian, PauliString, SparsePauliOp};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ChemError, ChemResult};
use crate::fermionic::{FermionicOp, LadderOp};

/// Imaginary parts and weights below this are treated as round-off.
const MAP_ATOL: f64 = 1e-10;

/// Terms accumulated between intermediate simplifications.
const SIMPLIFY_EVERY: usize = 256;

pub trait QubitMapper {
    fn name(&self) -> &'static str;

    /// Qubit image of `a†_mode` on `num_modes` qubits.
    fn creation(&self, mode: usize, num_modes: usize) -> ChemResult<SparsePauliOp>;

    /// Map a Hermitian fermionic operator onto a real Pauli Hamiltonian.
    fn map(&self, op: &FermionicOp) -> ChemResult<PauliHamiltonian> {
        let n = op.num_spin_orbitals();
        let creators = (0..n)
            .map(|j| self.creation(j, n))
            .collect::<ChemResult<Vec<_>>>()?;
        let annihilators: Vec<SparsePauliOp> = creators.iter().map(|c| c.adjoint()).collect();

        let mut total = SparsePauliOp::zero(n)?;
        for (k, (ops, coefficient)) in op.terms().iter().enumerate() {
            let mut product = SparsePauliOp::identity(n, Complex64::new(*coefficient, 0.0))?;
            for ladder in ops {
                let image = match ladder {
                    LadderOp::Create(j) => &creators[*j],
                    LadderOp::Annihilate(j) => &annihilators[*j],
                };
                product = product.compose(image)?.simplify(0.0);
            }
            total.add_assign(&product)?;
            if (k + 1) % SIMPLIFY_EVERY == 0 {
                total = total.simplify(0.0);
            }
        }

        let hamiltonian = total.to_hamiltonian(MAP_ATOL)?;
        debug!(
            mapper = self.name(),
            modes = n,
            terms = hamiltonian.num_terms(),
            "mapped fermionic operator"
        );
        Ok(hamiltonian)
    }
}

impl<M: QubitMapper + ?Sized> QubitMapper for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn creation(&self, mode: usize, num_modes: usize) -> ChemResult<SparsePauliOp> {
        (**self).creation(mode, num_modes)
    }

    fn map(&self, op: &FermionicOp) -> ChemResult<PauliHamiltonian> {
        (**self).map(op)
    }
}

fn pauli_string(ops: impl IntoIterator<Item = (usize, Pauli)>) -> ChemResult<PauliString> {
    let ops: Vec<(usize, Pauli)> = ops.into_iter().collect();
    Ok(PauliString::from_operators(&ops)?)
}

/// `½ (S_x - i S_y)` for the two strings that make up a ladder image.
fn ladder_image(num_modes: usize, x_part: PauliString, y_part: PauliString) -> ChemResult<SparsePauliOp> {
    Ok(SparsePauliOp::from_terms(
        num_modes,
        [
            (x_part, Complex64::new(0.5, 0.0)),
            (y_part, Complex64::new(0.0, -0.5)),
        ],
    )?)
}

fn check_mode(mode: usize, num_modes: usize) -> ChemResult<()> {
    if mode >= num_modes {
        return Err(ChemError::ModeOutOfRange { mode, num_modes });
    }
    Ok(())
}

/// Occupation of mode `j` stored on qubit `j`; parity of the lower modes
/// carried by a Z string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JordanWignerMapper;

impl QubitMapper for JordanWignerMapper {
    fn name(&self) -> &'static str {
        "jordan_wigner"
    }

    fn creation(&self, mode: usize, num_modes: usize) -> ChemResult<SparsePauliOp> {
        check_mode(mode, num_modes)?;
        let z_below = (0..mode).map(|q| (q, Pauli::Z));
        let x_part = pauli_string(z_below.clone().chain([(mode, Pauli::X)]))?;
        let y_part = pauli_string(z_below.chain([(mode, Pauli::Y)]))?;
        ladder_image(num_modes, x_part, y_part)
    }
}

/// Qubit `j` stores the parity of modes `0..=j`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParityMapper;

impl QubitMapper for ParityMapper {
    fn name(&self) -> &'static str {
        "parity"
    }

    fn creation(&self, mode: usize, num_modes: usize) -> ChemResult<SparsePauliOp> {
        check_mode(mode, num_modes)?;
        let x_above = (mode + 1..num_modes).map(|q| (q, Pauli::X));
        let z_below = mode.checked_sub(1).map(|q| (q, Pauli::Z));
        let x_part = pauli_string(
            z_below
                .into_iter()
                .chain([(mode, Pauli::X)])
                .chain(x_above.clone()),
        )?;
        let y_part = pauli_string([(mode, Pauli::Y)].into_iter().chain(x_above))?;
        ladder_image(num_modes, x_part, y_part)
    }
}

/// Mapper selection for configuration files and the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapperKind {
    #[default]
    JordanWigner,
    Parity,
}

impl MapperKind {
    pub fn mapper(self) -> Box<dyn QubitMapper> {
        match self {
            MapperKind::JordanWigner => Box::new(JordanWignerMapper),
            MapperKind::Parity => Box::new(ParityMapper),
        }
    }
}

impl FromStr for MapperKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "jordan_wigner" | "jw" => Ok(MapperKind::JordanWigner),
            "parity" => Ok(MapperKind::Parity),
            other => Err(format!("unknown mapper {:?} (expected jordan_wigner or parity)", other)),
        }
    }
}

impl fmt::Display for MapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperKind::JordanWigner => write!(f, "jordan_wigner"),
            MapperKind::Parity => write!(f, "parity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use molq_ops::OpsError;

    fn anticommutator(a: &SparsePauliOp, b: &SparsePauliOp) -> SparsePauliOp {
        a.compose(b)
            .unwrap()
            .add(&b.compose(a).unwrap())
            .unwrap()
            .simplify(1e-12)
    }

    fn check_canonical_relations(mapper: &dyn QubitMapper, n: usize) {
        let creators: Vec<_> = (0..n).map(|j| mapper.creation(j, n).unwrap()).collect();
        for i in 0..n {
            for j in 0..n {
                let ac = anticommutator(&creators[i].adjoint(), &creators[j]);
                if i == j {
                    assert_eq!(ac.num_terms(), 1, "{{a_{i}, a†_{j}}}");
                    let (pauli, c) = ac.terms()[0];
                    assert!(pauli.is_identity());
                    assert_abs_diff_eq!(c.re, 1.0, epsilon = 1e-12);
                } else {
                    assert!(ac.is_empty(), "{{a_{i}, a†_{j}}} should vanish");
                }
                assert!(anticommutator(&creators[i], &creators[j]).is_empty());
            }
        }
    }

    #[test]
    fn test_jordan_wigner_anticommutation() {
        check_canonical_relations(&JordanWignerMapper, 4);
    }

    #[test]
    fn test_parity_anticommutation() {
        check_canonical_relations(&ParityMapper, 4);
    }

    #[test]
    fn test_jordan_wigner_number_operator() {
        let mut op = FermionicOp::new(3);
        op.add_term(vec![LadderOp::Create(2), LadderOp::Annihilate(2)], 1.0)
            .unwrap();
        let h = JordanWignerMapper.map(&op).unwrap();
        assert_eq!(h.num_terms(), 2);
        assert_eq!(h.num_qubits(), 3);
        assert_abs_diff_eq!(h.identity_coefficient(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(
            h.coefficient_of(&PauliString::single(2, Pauli::Z)),
            -0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_parity_number_operator() {
        let mut op = FermionicOp::new(3);
        op.add_term(vec![LadderOp::Create(1), LadderOp::Annihilate(1)], 1.0)
            .unwrap();
        let h = ParityMapper.map(&op).unwrap();
        let zz = PauliString::from_label("IZZ").unwrap();
        assert_eq!(h.num_terms(), 2);
        assert_abs_diff_eq!(h.coefficient_of(&zz), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_hopping_term_jordan_wigner() {
        // a†_0 a_1 + a†_1 a_0 = ½ (X_0 X_1 + Y_0 Y_1)
        let mut op = FermionicOp::new(2);
        op.add_term(vec![LadderOp::Create(0), LadderOp::Annihilate(1)], 1.0)
            .unwrap();
        op.add_term(vec![LadderOp::Create(1), LadderOp::Annihilate(0)], 1.0)
            .unwrap();
        let h = JordanWignerMapper.map(&op).unwrap();
        assert_eq!(h.num_terms(), 2);
        assert_abs_diff_eq!(
            h.coefficient_of(&PauliString::from_label("XX").unwrap()),
            0.5,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            h.coefficient_of(&PauliString::from_label("YY").unwrap()),
            0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_h2_sto3g_jordan_wigner_hamiltonian() {
        let problem = crate::HartreeFockDriver::new("H 0 0 0; H 0 0 0.735", "sto3g")
            .run()
            .unwrap();
        let h = JordanWignerMapper.map(&problem.second_q_op().unwrap()).unwrap();
        assert_eq!(h.num_qubits(), 4);
        assert_eq!(h.num_terms(), 15);
        assert_abs_diff_eq!(h.identity_coefficient(), -0.81055, epsilon = 1e-4);

        // alpha modes 0..2, beta modes 2..4; both spins see the same orbitals
        for (qubit, weight) in [(0, 0.17218), (1, -0.22575), (2, 0.17218), (3, -0.22575)] {
            assert_abs_diff_eq!(
                h.coefficient_of(&PauliString::single(qubit, Pauli::Z)),
                weight,
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_non_hermitian_input_is_rejected() {
        let mut op = FermionicOp::new(1);
        op.add_term(vec![LadderOp::Create(0)], 1.0).unwrap();
        assert!(matches!(
            JordanWignerMapper.map(&op),
            Err(ChemError::Ops(OpsError::NonHermitian { .. }))
        ));
    }

    #[test]
    fn test_mode_limit() {
        let op = FermionicOp::new(65);
        assert!(matches!(
            JordanWignerMapper.map(&op),
            Err(ChemError::Ops(OpsError::QubitLimit { .. }))
        ));
        assert!(JordanWignerMapper.creation(3, 3).is_err());
    }

    #[test]
    fn test_mapper_kind_parse() {
        assert_eq!("jw".parse::<MapperKind>().unwrap(), MapperKind::JordanWigner);
        assert_eq!("Parity".parse::<MapperKind>().unwrap(), MapperKind::Parity);
        assert_eq!(
            "jordan-wigner".parse::<MapperKind>().unwrap(),
            MapperKind::JordanWigner
        );
        assert!("bravyi_kitaev".parse::<MapperKind>().is_err());
        assert_eq!(MapperKind::Parity.mapper().name(), "parity");
    }
}
