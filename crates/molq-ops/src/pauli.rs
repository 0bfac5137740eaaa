//! Single-qubit Paulis and symplectic Pauli strings.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{OpsError, OpsResult};

/// Widest register a [`PauliString`] can address.
pub const MAX_QUBITS: usize = 64;

/// A single Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity operator.
    I,
    /// Pauli-X operator.
    X,
    /// Pauli-Y operator.
    Y,
    /// Pauli-Z operator.
    Z,
}

impl Pauli {
    /// Get the name of this Pauli operator.
    pub fn name(&self) -> &'static str {
        match self {
            Pauli::I => "I",
            Pauli::X => "X",
            Pauli::Y => "Y",
            Pauli::Z => "Z",
        }
    }

    /// Symplectic (x, z) bits.
    fn bits(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }

    fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        }
    }

    /// Parse a single label character.
    pub fn from_char(c: char) -> OpsResult<Self> {
        match c {
            'I' | 'i' => Ok(Pauli::I),
            'X' | 'x' => Ok(Pauli::X),
            'Y' | 'y' => Ok(Pauli::Y),
            'Z' | 'z' => Ok(Pauli::Z),
            other => Err(OpsError::InvalidLabel(other)),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tensor product of single-qubit Paulis with no extra phase.
///
/// Bit `q` of `x`/`z` holds the symplectic representation of the Pauli on
/// qubit `q`: `X = (1, 0)`, `Y = (1, 1)`, `Z = (0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PauliString {
    x: u64,
    z: u64,
}

impl PauliString {
    /// The identity string.
    pub fn identity() -> Self {
        Self::default()
    }

    /// A single Pauli on `qubit`.
    ///
    /// # Panics
    /// Panics if `qubit >= MAX_QUBITS`.
    pub fn single(qubit: usize, pauli: Pauli) -> Self {
        assert!(qubit < MAX_QUBITS, "qubit {} exceeds Pauli string width", qubit);
        let mut s = Self::identity();
        s.set(qubit, pauli);
        s
    }

    /// Build from explicit `(qubit, pauli)` pairs. Later pairs on the same
    /// qubit overwrite earlier ones.
    pub fn from_operators(operators: &[(usize, Pauli)]) -> OpsResult<Self> {
        let mut s = Self::identity();
        for &(qubit, pauli) in operators {
            if qubit >= MAX_QUBITS {
                return Err(OpsError::QubitLimit {
                    qubit,
                    max: MAX_QUBITS,
                });
            }
            s.set(qubit, pauli);
        }
        Ok(s)
    }

    /// Parse a dense label such as `"IXYZ"`. The rightmost character acts on
    /// qubit 0.
    pub fn from_label(label: &str) -> OpsResult<Self> {
        let chars: Vec<char> = label.chars().collect();
        if chars.len() > MAX_QUBITS {
            return Err(OpsError::QubitLimit {
                qubit: chars.len() - 1,
                max: MAX_QUBITS,
            });
        }
        let mut s = Self::identity();
        for (qubit, &c) in chars.iter().rev().enumerate() {
            s.set(qubit, Pauli::from_char(c)?);
        }
        Ok(s)
    }

    /// Raw symplectic masks `(x, z)`.
    pub fn masks(&self) -> (u64, u64) {
        (self.x, self.z)
    }

    /// Qubits carrying an X or Y component (bit-flip mask).
    pub fn x_mask(&self) -> u64 {
        self.x
    }

    /// Qubits carrying a Z or Y component (phase mask).
    pub fn z_mask(&self) -> u64 {
        self.z
    }

    /// Number of Y factors.
    pub fn num_y(&self) -> u32 {
        (self.x & self.z).count_ones()
    }

    pub fn get(&self, qubit: usize) -> Pauli {
        if qubit >= MAX_QUBITS {
            return Pauli::I;
        }
        Pauli::from_bits((self.x >> qubit) & 1 == 1, (self.z >> qubit) & 1 == 1)
    }

    fn set(&mut self, qubit: usize, pauli: Pauli) {
        let (xb, zb) = pauli.bits();
        let mask = 1u64 << qubit;
        self.x = (self.x & !mask) | if xb { mask } else { 0 };
        self.z = (self.z & !mask) | if zb { mask } else { 0 };
    }

    pub fn is_identity(&self) -> bool {
        self.x == 0 && self.z == 0
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> u32 {
        (self.x | self.z).count_ones()
    }

    /// Highest qubit with a non-identity factor.
    pub fn max_qubit(&self) -> Option<usize> {
        let support = self.x | self.z;
        if support == 0 {
            None
        } else {
            Some(63 - support.leading_zeros() as usize)
        }
    }

    /// Non-identity factors in ascending qubit order.
    pub fn operators(&self) -> impl Iterator<Item = (usize, Pauli)> + '_ {
        let support = self.x | self.z;
        (0..MAX_QUBITS)
            .filter(move |q| (support >> q) & 1 == 1)
            .map(move |q| (q, self.get(q)))
    }

    /// Matrix product `self * other`, returned as `(i^k, string)` with the
    /// phase exponent `k` in `0..4`.
    pub fn compose(&self, other: &PauliString) -> (u8, PauliString) {
        let overlap = (self.x | self.z) & (other.x | other.z);
        let mut k: u8 = 0;
        let mut bits = overlap;
        while bits != 0 {
            let q = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            k = (k + single_phase(self.get(q), other.get(q))) % 4;
        }
        (
            k,
            PauliString {
                x: self.x ^ other.x,
                z: self.z ^ other.z,
            },
        )
    }

    /// Whether the two strings commute.
    pub fn commutes(&self, other: &PauliString) -> bool {
        let anti = (self.x & other.z).count_ones() + (self.z & other.x).count_ones();
        anti % 2 == 0
    }

    /// Dense label over `num_qubits` qubits, qubit 0 rightmost.
    pub fn label(&self, num_qubits: usize) -> String {
        (0..num_qubits).rev().map(|q| self.get(q).name()).collect()
    }
}

/// Phase exponent `k` such that `a * b = i^k c` for single-qubit Paulis.
fn single_phase(a: Pauli, b: Pauli) -> u8 {
    use Pauli::*;
    match (a, b) {
        (X, Y) | (Y, Z) | (Z, X) => 1,
        (Y, X) | (Z, Y) | (X, Z) => 3,
        _ => 0,
    }
}

/// `i^k` as a complex number.
pub fn phase_to_complex(k: u8) -> Complex64 {
    match k % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return write!(f, "I");
        }
        for (i, (qubit, pauli)) in self.operators().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}[{}]", pauli, qubit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_label_roundtrip_and_order() {
        let s = PauliString::from_label("XIZY").unwrap();
        assert_eq!(s.get(0), Pauli::Y);
        assert_eq!(s.get(1), Pauli::Z);
        assert_eq!(s.get(2), Pauli::I);
        assert_eq!(s.get(3), Pauli::X);
        assert_eq!(s.label(4), "XIZY");
        assert_eq!(s.weight(), 3);
        assert_eq!(s.max_qubit(), Some(3));
        assert_eq!(s.num_y(), 1);
    }

    #[test]
    fn test_invalid_label() {
        assert_eq!(
            PauliString::from_label("XQ").unwrap_err(),
            OpsError::InvalidLabel('Q')
        );
    }

    #[test]
    fn test_from_operators_limit() {
        assert!(matches!(
            PauliString::from_operators(&[(64, Pauli::Z)]),
            Err(OpsError::QubitLimit { qubit: 64, .. })
        ));
    }

    #[test]
    fn test_single_qubit_products() {
        let x = PauliString::single(0, Pauli::X);
        let y = PauliString::single(0, Pauli::Y);
        let z = PauliString::single(0, Pauli::Z);

        // XY = iZ
        assert_eq!(x.compose(&y), (1, z));
        // YX = -iZ
        assert_eq!(y.compose(&x), (3, z));
        // ZX = iY
        assert_eq!(z.compose(&x), (1, y));
        // XX = I
        assert_eq!(x.compose(&x), (0, PauliString::identity()));
    }

    #[test]
    fn test_commutation() {
        let xx = PauliString::from_label("XX").unwrap();
        let zz = PauliString::from_label("ZZ").unwrap();
        let zi = PauliString::from_label("ZI").unwrap();
        assert!(xx.commutes(&zz));
        assert!(!xx.commutes(&zi));
    }

    #[test]
    fn test_display() {
        let s = PauliString::from_operators(&[(0, Pauli::Z), (2, Pauli::X)]).unwrap();
        assert_eq!(s.to_string(), "Z[0] X[2]");
        assert_eq!(PauliString::identity().to_string(), "I");
    }

    fn arb_pauli_string(n: usize) -> impl Strategy<Value = PauliString> {
        prop::collection::vec(0u8..4, n).prop_map(|letters| {
            let ops: Vec<(usize, Pauli)> = letters
                .into_iter()
                .enumerate()
                .map(|(q, l)| {
                    let p = match l {
                        0 => Pauli::I,
                        1 => Pauli::X,
                        2 => Pauli::Y,
                        _ => Pauli::Z,
                    };
                    (q, p)
                })
                .collect();
            PauliString::from_operators(&ops).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_square_is_identity(p in arb_pauli_string(8)) {
            prop_assert_eq!(p.compose(&p), (0, PauliString::identity()));
        }

        #[test]
        fn prop_composition_is_associative(
            a in arb_pauli_string(6),
            b in arb_pauli_string(6),
            c in arb_pauli_string(6),
        ) {
            let (k_ab, ab) = a.compose(&b);
            let (k_ab_c, ab_c) = ab.compose(&c);
            let (k_bc, bc) = b.compose(&c);
            let (k_a_bc, a_bc) = a.compose(&bc);
            prop_assert_eq!(ab_c, a_bc);
            prop_assert_eq!((k_ab + k_ab_c) % 4, (k_bc + k_a_bc) % 4);
        }

        #[test]
        fn prop_commutes_matches_phases(a in arb_pauli_string(6), b in arb_pauli_string(6)) {
            let (k_ab, _) = a.compose(&b);
            let (k_ba, _) = b.compose(&a);
            let same = k_ab % 4 == k_ba % 4;
            prop_assert_eq!(same, a.commutes(&b));
        }
    }
}
