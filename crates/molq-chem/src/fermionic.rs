//! Second-quantized fermionic operators.

use std::fmt;

use crate::error::{ChemError, ChemResult};

/// A creation (`+_j`) or annihilation (`-_j`) operator on spin orbital `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LadderOp {
    Create(usize),
    Annihilate(usize),
}

impl LadderOp {
    pub fn mode(&self) -> usize {
        match self {
            LadderOp::Create(j) | LadderOp::Annihilate(j) => *j,
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(self, LadderOp::Create(_))
    }
}

impl fmt::Display for LadderOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LadderOp::Create(j) => write!(f, "+_{}", j),
            LadderOp::Annihilate(j) => write!(f, "-_{}", j),
        }
    }
}

/// Real-weighted sum of products of ladder operators.
///
/// Each product is applied right to left, so `[Create(0), Annihilate(1)]`
/// is `a†_0 a_1`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FermionicOp {
    num_spin_orbitals: usize,
    terms: Vec<(Vec<LadderOp>, f64)>,
}

impl FermionicOp {
    pub fn new(num_spin_orbitals: usize) -> Self {
        Self {
            num_spin_orbitals,
            terms: Vec::new(),
        }
    }

    pub fn add_term(&mut self, ops: Vec<LadderOp>, coefficient: f64) -> ChemResult<()> {
        if let Some(op) = ops.iter().find(|op| op.mode() >= self.num_spin_orbitals) {
            return Err(ChemError::ModeOutOfRange {
                mode: op.mode(),
                num_modes: self.num_spin_orbitals,
            });
        }
        self.terms.push((ops, coefficient));
        Ok(())
    }

    pub fn num_spin_orbitals(&self) -> usize {
        self.num_spin_orbitals
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[(Vec<LadderOp>, f64)] {
        &self.terms
    }

    /// Sum of the weights of terms with no ladder operators.
    pub fn constant(&self) -> f64 {
        self.terms
            .iter()
            .filter(|(ops, _)| ops.is_empty())
            .map(|(_, c)| c)
            .sum()
    }

    /// Number-operator sum `Σ_j a†_j a_j`.
    pub fn number_operator(num_spin_orbitals: usize) -> Self {
        let terms = (0..num_spin_orbitals)
            .map(|j| (vec![LadderOp::Create(j), LadderOp::Annihilate(j)], 1.0))
            .collect();
        Self {
            num_spin_orbitals,
            terms,
        }
    }
}

impl fmt::Display for FermionicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "FermionicOp ({} terms, {} spin orbitals):",
            self.terms.len(),
            self.num_spin_orbitals
        )?;
        for (ops, c) in &self.terms {
            write!(f, "  {:+.8}", c)?;
            for op in ops {
                write!(f, " {}", op)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_term_checks_modes() {
        let mut op = FermionicOp::new(4);
        op.add_term(vec![LadderOp::Create(0), LadderOp::Annihilate(3)], 0.5)
            .unwrap();
        assert_eq!(op.num_terms(), 1);
        assert!(matches!(
            op.add_term(vec![LadderOp::Create(4)], 1.0),
            Err(ChemError::ModeOutOfRange { mode: 4, num_modes: 4 })
        ));
    }

    #[test]
    fn test_display_labels() {
        let mut op = FermionicOp::new(2);
        op.add_term(vec![LadderOp::Create(0), LadderOp::Annihilate(1)], -0.25)
            .unwrap();
        let text = op.to_string();
        assert!(text.contains("-0.25000000 +_0 -_1"));
    }

    #[test]
    fn test_constant_and_number_operator() {
        let mut op = FermionicOp::number_operator(3);
        op.add_term(Vec::new(), 1.5).unwrap();
        assert_eq!(op.num_terms(), 4);
        assert_eq!(op.constant(), 1.5);
        assert!(op.terms()[0].0[0].is_creation());
    }
}
