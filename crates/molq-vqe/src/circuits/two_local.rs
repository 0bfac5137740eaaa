//! Two-local trial circuits: alternating layers of single-qubit rotations
//! and two-qubit entanglers.

use molq_ir::{Circuit, QubitId, StandardGate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VqeError};

/// Parameterized single-qubit rotation used in a rotation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationGate {
    Rx,
    Ry,
    Rz,
}

impl RotationGate {
    fn gate(self, theta: f64) -> StandardGate {
        match self {
            RotationGate::Rx => StandardGate::Rx(theta),
            RotationGate::Ry => StandardGate::Ry(theta),
            RotationGate::Rz => StandardGate::Rz(theta),
        }
    }
}

impl FromStr for RotationGate {
    type Err = VqeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rx" => Ok(RotationGate::Rx),
            "ry" => Ok(RotationGate::Ry),
            "rz" => Ok(RotationGate::Rz),
            other => Err(VqeError::InvalidAnsatz(format!("unknown rotation gate {:?}", other))),
        }
    }
}

impl fmt::Display for RotationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gate(0.0).name())
    }
}

/// Fixed two-qubit gate used in an entanglement layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntanglementGate {
    Cx,
    Cz,
}

impl EntanglementGate {
    fn gate(self) -> StandardGate {
        match self {
            EntanglementGate::Cx => StandardGate::CX,
            EntanglementGate::Cz => StandardGate::CZ,
        }
    }
}

impl FromStr for EntanglementGate {
    type Err = VqeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cx" | "cnot" => Ok(EntanglementGate::Cx),
            "cz" => Ok(EntanglementGate::Cz),
            other => Err(VqeError::InvalidAnsatz(format!(
                "unknown entanglement gate {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for EntanglementGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gate().name())
    }
}

/// Which qubit pairs an entanglement layer couples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entanglement {
    /// Every pair `(i, j)` with `i < j`.
    #[default]
    Full,
    /// Nearest neighbours `(i, i + 1)`.
    Linear,
    /// Nearest neighbours from the last pair down to the first.
    ReverseLinear,
    /// Linear plus the wrap-around pair `(n - 1, 0)`, placed first.
    Circular,
}

impl Entanglement {
    /// Qubit pairs for one entanglement layer on `num_qubits` qubits.
    pub fn pairs(self, num_qubits: usize) -> Vec<(usize, usize)> {
        let linear = || (0..num_qubits.saturating_sub(1)).map(|i| (i, i + 1));
        match self {
            Entanglement::Full => (0..num_qubits)
                .flat_map(|i| (i + 1..num_qubits).map(move |j| (i, j)))
                .collect(),
            Entanglement::Linear => linear().collect(),
            Entanglement::ReverseLinear => linear().rev().collect(),
            Entanglement::Circular => {
                let mut pairs = Vec::with_capacity(num_qubits);
                if num_qubits > 2 {
                    pairs.push((num_qubits - 1, 0));
                }
                pairs.extend(linear());
                pairs
            }
        }
    }
}

impl FromStr for Entanglement {
    type Err = VqeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "full" => Ok(Entanglement::Full),
            "linear" => Ok(Entanglement::Linear),
            "reverse_linear" => Ok(Entanglement::ReverseLinear),
            "circular" => Ok(Entanglement::Circular),
            other => Err(VqeError::InvalidAnsatz(format!(
                "unknown entanglement pattern {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for Entanglement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entanglement::Full => "full",
            Entanglement::Linear => "linear",
            Entanglement::ReverseLinear => "reverse_linear",
            Entanglement::Circular => "circular",
        };
        f.write_str(name)
    }
}

/// A two-local ansatz of `reps` repetitions of (rotation layer,
/// entanglement layer) followed by a final rotation layer.
///
/// Parameters are consumed layer by layer; inside a layer, rotation block by
/// rotation block, and inside a block, qubit by qubit.
///
/// ```
/// use molq_vqe::circuits::{Entanglement, EntanglementGate, RotationGate, TwoLocal};
///
/// let ansatz = TwoLocal::new(4, vec![RotationGate::Ry], vec![EntanglementGate::Cz])
///     .unwrap()
///     .with_reps(3)
///     .with_entanglement(Entanglement::Full);
/// assert_eq!(ansatz.num_parameters(), 16);
/// let circuit = ansatz.bind(&[0.1; 16]).unwrap();
/// assert_eq!(circuit.count_ops()["cz"], 18);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TwoLocal {
    num_qubits: usize,
    rotation_blocks: Vec<RotationGate>,
    entanglement_blocks: Vec<EntanglementGate>,
    entanglement: Entanglement,
    reps: usize,
    skip_final_rotation_layer: bool,
    initial_state: Option<Circuit>,
}

impl TwoLocal {
    pub fn new(
        num_qubits: usize,
        rotation_blocks: Vec<RotationGate>,
        entanglement_blocks: Vec<EntanglementGate>,
    ) -> Result<Self> {
        if num_qubits == 0 {
            return Err(VqeError::InvalidAnsatz("an ansatz needs at least one qubit".into()));
        }
        if u32::try_from(num_qubits).is_err() {
            return Err(VqeError::InvalidAnsatz(format!("{} qubits", num_qubits)));
        }
        if rotation_blocks.is_empty() && entanglement_blocks.is_empty() {
            return Err(VqeError::InvalidAnsatz("no rotation or entanglement blocks".into()));
        }
        Ok(Self {
            num_qubits,
            rotation_blocks,
            entanglement_blocks,
            entanglement: Entanglement::default(),
            reps: 3,
            skip_final_rotation_layer: false,
            initial_state: None,
        })
    }

    pub fn with_reps(mut self, reps: usize) -> Self {
        self.reps = reps;
        self
    }

    pub fn with_entanglement(mut self, entanglement: Entanglement) -> Self {
        self.entanglement = entanglement;
        self
    }

    pub fn with_skip_final_rotation_layer(mut self, skip: bool) -> Self {
        self.skip_final_rotation_layer = skip;
        self
    }

    /// Prepend a fixed state-preparation circuit of the same width.
    pub fn with_initial_state(mut self, initial_state: Circuit) -> Result<Self> {
        if initial_state.num_qubits() != self.num_qubits {
            return Err(VqeError::InvalidAnsatz(format!(
                "initial state has {} qubits, ansatz has {}",
                initial_state.num_qubits(),
                self.num_qubits
            )));
        }
        self.initial_state = Some(initial_state);
        Ok(self)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn reps(&self) -> usize {
        self.reps
    }

    pub fn entanglement(&self) -> Entanglement {
        self.entanglement
    }

    fn num_rotation_layers(&self) -> usize {
        if self.skip_final_rotation_layer {
            self.reps
        } else {
            self.reps + 1
        }
    }

    pub fn num_parameters(&self) -> usize {
        self.num_qubits * self.rotation_blocks.len() * self.num_rotation_layers()
    }

    /// Pairs coupled by each entanglement layer.
    pub fn entanglement_pairs(&self) -> Vec<(usize, usize)> {
        self.entanglement.pairs(self.num_qubits)
    }

    /// Build the concrete circuit for one parameter vector.
    pub fn bind(&self, parameters: &[f64]) -> Result<Circuit> {
        if parameters.len() != self.num_parameters() {
            return Err(VqeError::ParameterMismatch {
                expected: self.num_parameters(),
                got: parameters.len(),
            });
        }

        // width fits in u32, checked in `new`
        let mut circuit = Circuit::with_size("two_local", self.num_qubits as u32);
        if let Some(initial) = &self.initial_state {
            circuit.compose(initial)?;
        }

        let pairs = self.entanglement_pairs();
        let mut params = parameters.iter().copied();
        for layer in 0..=self.reps {
            if layer < self.num_rotation_layers() {
                for block in &self.rotation_blocks {
                    for (q, theta) in (0..self.num_qubits as u32).zip(params.by_ref()) {
                        circuit.append(block.gate(theta), &[QubitId(q)])?;
                    }
                }
            }
            if layer < self.reps {
                for block in &self.entanglement_blocks {
                    for &(a, b) in &pairs {
                        circuit.append(block.gate(), &[QubitId(a as u32), QubitId(b as u32)])?;
                    }
                }
            }
        }
        Ok(circuit)
    }
}

impl fmt::Display for TwoLocal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |blocks: Vec<String>| blocks.join(",");
        write!(
            f,
            "TwoLocal({} qubits, rotations [{}], entanglers [{}], {}, reps {})",
            self.num_qubits,
            names(self.rotation_blocks.iter().map(|g| g.to_string()).collect()),
            names(self.entanglement_blocks.iter().map(|g| g.to_string()).collect()),
            self.entanglement,
            self.reps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> TwoLocal {
        TwoLocal::new(4, vec![RotationGate::Ry], vec![EntanglementGate::Cz]).unwrap()
    }

    #[test]
    fn test_entanglement_pairs() {
        assert_eq!(
            Entanglement::Full.pairs(4),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        assert_eq!(Entanglement::Linear.pairs(3), vec![(0, 1), (1, 2)]);
        assert_eq!(Entanglement::ReverseLinear.pairs(3), vec![(1, 2), (0, 1)]);
        assert_eq!(Entanglement::Circular.pairs(3), vec![(2, 0), (0, 1), (1, 2)]);
        assert_eq!(Entanglement::Circular.pairs(2), vec![(0, 1)]);
        assert!(Entanglement::Full.pairs(1).is_empty());
    }

    #[test]
    fn test_reference_layout() {
        let ansatz = reference();
        assert_eq!(ansatz.reps(), 3);
        assert_eq!(ansatz.num_parameters(), 16);

        let params: Vec<f64> = (0..16).map(|k| k as f64 * 0.1).collect();
        let circuit = ansatz.bind(&params).unwrap();
        let counts = circuit.count_ops();
        assert_eq!(counts["ry"], 16);
        assert_eq!(counts["cz"], 18);

        // first layer: ry(θ_q) on qubit q, then the six cz gates
        let instrs = circuit.instructions();
        assert_eq!(instrs[0].gate, StandardGate::Ry(0.0));
        assert_eq!(instrs[3].gate, StandardGate::Ry(params[3]));
        assert_eq!(instrs[3].qubits, vec![QubitId(3)]);
        assert_eq!(instrs[4].gate, StandardGate::CZ);
        assert_eq!(instrs[10].gate, StandardGate::Ry(params[4]));
        // final rotation layer closes the circuit
        assert_eq!(instrs.last().unwrap().gate, StandardGate::Ry(params[15]));
    }

    #[test]
    fn test_parameter_counts() {
        let ansatz = TwoLocal::new(
            3,
            vec![RotationGate::Ry, RotationGate::Rz],
            vec![EntanglementGate::Cx],
        )
        .unwrap()
        .with_reps(2)
        .with_entanglement(Entanglement::Linear);
        assert_eq!(ansatz.num_parameters(), 3 * 2 * 3);

        let skipped = ansatz.clone().with_skip_final_rotation_layer(true);
        assert_eq!(skipped.num_parameters(), 3 * 2 * 2);
        let circuit = skipped.bind(&[0.0; 12]).unwrap();
        assert_eq!(circuit.instructions().last().unwrap().gate, StandardGate::CX);

        let none = reference().with_reps(0).with_skip_final_rotation_layer(true);
        assert_eq!(none.num_parameters(), 0);
        assert!(none.bind(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_parameter_count() {
        assert_eq!(
            reference().bind(&[0.0; 15]),
            Err(VqeError::ParameterMismatch {
                expected: 16,
                got: 15
            })
        );
    }

    #[test]
    fn test_initial_state_is_prepended() {
        let mut init = Circuit::with_size("hf", 4);
        init.x(QubitId(0)).unwrap();
        let ansatz = reference().with_initial_state(init).unwrap();
        let circuit = ansatz.bind(&[0.0; 16]).unwrap();
        assert_eq!(circuit.instructions()[0].gate, StandardGate::X);
        assert_eq!(circuit.len(), 1 + 16 + 18);

        let narrow = Circuit::with_size("hf", 2);
        assert!(matches!(
            reference().with_initial_state(narrow),
            Err(VqeError::InvalidAnsatz(_))
        ));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(TwoLocal::new(0, vec![RotationGate::Ry], vec![]).is_err());
        assert!(TwoLocal::new(2, vec![], vec![]).is_err());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("RY".parse::<RotationGate>().unwrap(), RotationGate::Ry);
        assert_eq!("cnot".parse::<EntanglementGate>().unwrap(), EntanglementGate::Cx);
        assert_eq!(
            "reverse-linear".parse::<Entanglement>().unwrap(),
            Entanglement::ReverseLinear
        );
        assert!("star".parse::<Entanglement>().is_err());
        assert_eq!(Entanglement::Circular.to_string(), "circular");
        assert_eq!(
            reference().to_string(),
            "TwoLocal(4 qubits, rotations [ry], entanglers [cz], full, reps 3)"
        );
    }
}
