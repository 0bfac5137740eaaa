//! Expectation-value estimators.

use molq_ir::Circuit;
use molq_ops::PauliHamiltonian;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution};
use tracing::trace;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Computes `⟨ψ(circuit)|H|ψ(circuit)⟩`.
pub trait Estimator {
    fn name(&self) -> &'static str;

    fn estimate(&mut self, circuit: &Circuit, observable: &PauliHamiltonian) -> SimResult<f64>;

    /// Number of `estimate` calls served so far.
    fn num_evaluations(&self) -> usize;
}

impl<E: Estimator + ?Sized> Estimator for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn estimate(&mut self, circuit: &Circuit, observable: &PauliHamiltonian) -> SimResult<f64> {
        (**self).estimate(circuit, observable)
    }

    fn num_evaluations(&self) -> usize {
        (**self).num_evaluations()
    }
}

/// Exact expectation values from the full statevector.
#[derive(Debug, Clone, Default)]
pub struct StatevectorEstimator {
    evaluations: usize,
}

impl StatevectorEstimator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Estimator for StatevectorEstimator {
    fn name(&self) -> &'static str {
        "statevector"
    }

    fn estimate(&mut self, circuit: &Circuit, observable: &PauliHamiltonian) -> SimResult<f64> {
        let state = Statevector::from_circuit(circuit)?;
        let value = state.expectation(observable)?;
        self.evaluations += 1;
        trace!(evaluation = self.evaluations, value, "statevector estimate");
        Ok(value)
    }

    fn num_evaluations(&self) -> usize {
        self.evaluations
    }
}

/// Finite-shot estimates: every non-identity term is measured `shots` times
/// in its own eigenbasis, outcomes drawn from the exact distribution with a
/// seeded generator.
#[derive(Debug, Clone)]
pub struct ShotEstimator {
    shots: u32,
    rng: StdRng,
    evaluations: usize,
}

impl ShotEstimator {
    pub fn new(shots: u32, seed: u64) -> SimResult<Self> {
        if shots == 0 {
            return Err(SimError::ZeroShots);
        }
        Ok(Self {
            shots,
            rng: StdRng::seed_from_u64(seed),
            evaluations: 0,
        })
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Sample mean of `shots` ±1 outcomes with `P(+1) = (1 + expectation) / 2`.
    /// The count of +1 outcomes is a single binomial draw.
    fn sample(&mut self, expectation: f64) -> SimResult<f64> {
        let p_plus = ((1.0 + expectation) / 2.0).clamp(0.0, 1.0);
        let binomial = Binomial::new(u64::from(self.shots), p_plus).map_err(|_| {
            SimError::InvalidProbability {
                shots: self.shots,
                probability: p_plus,
            }
        })?;
        let plus = binomial.sample(&mut self.rng);
        Ok(2.0 * plus as f64 / self.shots as f64 - 1.0)
    }
}

impl Estimator for ShotEstimator {
    fn name(&self) -> &'static str {
        "shots"
    }

    fn estimate(&mut self, circuit: &Circuit, observable: &PauliHamiltonian) -> SimResult<f64> {
        let state = Statevector::from_circuit(circuit)?;
        if observable.num_qubits() > state.num_qubits() {
            return Err(SimError::WidthMismatch {
                circuit: state.num_qubits(),
                observable: observable.num_qubits(),
            });
        }
        let mut value = 0.0;
        for term in &observable.terms {
            if term.is_identity() {
                value += term.coefficient;
            } else {
                let exact = state.expectation_pauli(&term.pauli);
                value += term.coefficient * self.sample(exact)?;
            }
        }
        self.evaluations += 1;
        trace!(evaluation = self.evaluations, value, shots = self.shots, "shot estimate");
        Ok(value)
    }

    fn num_evaluations(&self) -> usize {
        self.evaluations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use molq_ir::QubitId;
    use molq_ops::PauliTerm;

    fn observable() -> PauliHamiltonian {
        PauliHamiltonian::new(vec![
            PauliTerm::identity(-0.5),
            PauliTerm::z(0.4, 0),
            PauliTerm::xx(0.3, 0, 1),
        ])
    }

    fn circuit() -> Circuit {
        let mut c = Circuit::with_size("bell", 2);
        c.ry(0.9, QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        c
    }

    #[test]
    fn test_statevector_estimator_counts() {
        let mut est = StatevectorEstimator::new();
        let a = est.estimate(&circuit(), &observable()).unwrap();
        let b = est.estimate(&circuit(), &observable()).unwrap();
        assert_eq!(a, b);
        assert_eq!(est.num_evaluations(), 2);
        // Ry(0.9) then CX: <Z0> = cos 0.9, <X0 X1> = sin 0.9
        assert_abs_diff_eq!(a, -0.5 + 0.4 * 0.9f64.cos() + 0.3 * 0.9f64.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_shot_estimator_is_seeded() {
        let mut a = ShotEstimator::new(2000, 11).unwrap();
        let mut b = ShotEstimator::new(2000, 11).unwrap();
        let ea = a.estimate(&circuit(), &observable()).unwrap();
        let eb = b.estimate(&circuit(), &observable()).unwrap();
        assert_eq!(ea, eb);

        let exact = StatevectorEstimator::new()
            .estimate(&circuit(), &observable())
            .unwrap();
        // 2000 shots: each term's standard error is below 0.023
        assert!((ea - exact).abs() < 0.1, "{} vs {}", ea, exact);
    }

    #[test]
    fn test_shot_estimator_exact_on_eigenstates() {
        let mut est = ShotEstimator::new(10, 3).unwrap();
        let c = Circuit::with_size("zero", 2);
        let value = est.estimate(&c, &PauliHamiltonian::new(vec![PauliTerm::z(0.7, 1)])).unwrap();
        assert_eq!(value, 0.7);
    }

    #[test]
    fn test_large_shot_counts() {
        // one draw per term, so millions of shots cost no more than ten
        let mut est = ShotEstimator::new(50_000_000, 5).unwrap();
        let value = est.estimate(&circuit(), &observable()).unwrap();
        let exact = StatevectorEstimator::new()
            .estimate(&circuit(), &observable())
            .unwrap();
        assert_abs_diff_eq!(value, exact, epsilon = 1e-3);
        assert_eq!(est.num_evaluations(), 1);
    }

    #[test]
    fn test_shot_noise_scales_with_shots() {
        let exact = StatevectorEstimator::new()
            .estimate(&circuit(), &observable())
            .unwrap();
        let spread = |shots: u32| {
            let mut est = ShotEstimator::new(shots, 21).unwrap();
            let deviations: Vec<f64> = (0..200)
                .map(|_| est.estimate(&circuit(), &observable()).unwrap() - exact)
                .collect();
            (deviations.iter().map(|d| d * d).sum::<f64>() / deviations.len() as f64).sqrt()
        };
        // standard error falls as 1/sqrt(shots): 100x the shots, 10x less noise
        let coarse = spread(100);
        let fine = spread(10_000);
        assert!(coarse > 5.0 * fine, "{} vs {}", coarse, fine);
        assert!(coarse < 0.2, "{}", coarse);
    }

    #[test]
    fn test_zero_shots() {
        assert!(matches!(ShotEstimator::new(0, 1), Err(SimError::ZeroShots)));
    }
}
