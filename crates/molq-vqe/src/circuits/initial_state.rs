//! Reference-state preparation.

use molq_chem::MapperKind;
use molq_ir::{Circuit, QubitId};

use crate::error::{Result, VqeError};

/// Qubit occupations of the Hartree-Fock determinant: the lowest `num_alpha`
/// alpha and `num_beta` beta spin orbitals filled, alpha block first.
pub fn hartree_fock_bitstring(
    num_spatial_orbitals: usize,
    num_particles: (usize, usize),
    mapper: MapperKind,
) -> Result<Vec<bool>> {
    let (num_alpha, num_beta) = num_particles;
    if num_alpha > num_spatial_orbitals || num_beta > num_spatial_orbitals {
        return Err(VqeError::InvalidConfig(format!(
            "({}, {}) particles do not fit in {} spatial orbitals",
            num_alpha, num_beta, num_spatial_orbitals
        )));
    }

    let n = num_spatial_orbitals;
    let occupations: Vec<bool> = (0..2 * n)
        .map(|mode| if mode < n { mode < num_alpha } else { mode - n < num_beta })
        .collect();

    Ok(match mapper {
        MapperKind::JordanWigner => occupations,
        // qubit j holds the parity of modes 0..=j
        MapperKind::Parity => occupations
            .iter()
            .scan(false, |parity, &occupied| {
                *parity ^= occupied;
                Some(*parity)
            })
            .collect(),
    })
}

/// X gates that take `|0…0⟩` to the Hartree-Fock state under `mapper`.
pub fn hartree_fock_state(
    num_spatial_orbitals: usize,
    num_particles: (usize, usize),
    mapper: MapperKind,
) -> Result<Circuit> {
    let bits = hartree_fock_bitstring(num_spatial_orbitals, num_particles, mapper)?;
    let mut circuit = Circuit::with_size("hartree_fock", bits.len() as u32);
    for (q, _) in bits.iter().enumerate().filter(|(_, set)| **set) {
        circuit.x(QubitId(q as u32))?;
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_string(bits: &[bool]) -> String {
        bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
    }

    #[test]
    fn test_jordan_wigner_occupations() {
        let bits = hartree_fock_bitstring(2, (1, 1), MapperKind::JordanWigner).unwrap();
        assert_eq!(as_string(&bits), "1010");
        let bits = hartree_fock_bitstring(3, (2, 1), MapperKind::JordanWigner).unwrap();
        assert_eq!(as_string(&bits), "110100");
    }

    #[test]
    fn test_parity_occupations() {
        let bits = hartree_fock_bitstring(2, (1, 1), MapperKind::Parity).unwrap();
        assert_eq!(as_string(&bits), "1100");
    }

    #[test]
    fn test_circuit() {
        let circuit = hartree_fock_state(2, (1, 1), MapperKind::JordanWigner).unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        let targets: Vec<_> = circuit.instructions().iter().map(|i| i.qubits[0]).collect();
        assert_eq!(targets, vec![QubitId(0), QubitId(2)]);
    }

    #[test]
    fn test_overfull() {
        assert!(matches!(
            hartree_fock_state(2, (3, 1), MapperKind::JordanWigner),
            Err(VqeError::InvalidConfig(_))
        ));
    }
}
