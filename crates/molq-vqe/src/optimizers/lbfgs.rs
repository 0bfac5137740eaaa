//! Limited-memory BFGS with finite-difference gradients.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use super::{check_budget, dot, norm, Objective, OptimizationResult, Optimizer, Tracker};
use crate::error::Result;

const ARMIJO: f64 = 1e-4;
const MIN_STEP: f64 = 1e-12;
/// Curvature pairs with `sᵀy` below this are dropped.
const MIN_CURVATURE: f64 = 1e-10;

/// L-BFGS with a backtracking Armijo line search. Gradients come from
/// central differences, `2n` evaluations each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lbfgs {
    /// Maximum number of iterations (line searches).
    pub maxiter: usize,
    /// Converged when every gradient component is below this.
    pub gtol: f64,
    /// Converged when the relative decrease of one step is below this.
    pub ftol: f64,
    /// Finite-difference step.
    pub epsilon: f64,
    /// Number of stored curvature pairs.
    pub memory: usize,
}

impl Default for Lbfgs {
    fn default() -> Self {
        Self {
            maxiter: 200,
            gtol: 1e-5,
            ftol: 1e-12,
            epsilon: 1e-6,
            memory: 10,
        }
    }
}

impl Lbfgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    fn gradient(&self, tracker: &mut Tracker<'_, '_>, x: &[f64]) -> Result<Vec<f64>> {
        let mut probe = x.to_vec();
        let mut gradient = Vec::with_capacity(x.len());
        for i in 0..x.len() {
            probe[i] = x[i] + self.epsilon;
            let plus = tracker.evaluate(&probe)?;
            probe[i] = x[i] - self.epsilon;
            let minus = tracker.evaluate(&probe)?;
            probe[i] = x[i];
            gradient.push((plus - minus) / (2.0 * self.epsilon));
        }
        Ok(gradient)
    }
}

/// Two-loop recursion: `H g` for the implicit inverse Hessian `H`.
fn inverse_hessian_times(pairs: &VecDeque<(Vec<f64>, Vec<f64>)>, g: &[f64]) -> Vec<f64> {
    let mut q = g.to_vec();
    let mut alphas = Vec::with_capacity(pairs.len());
    for (s, y) in pairs.iter().rev() {
        let rho = 1.0 / dot(y, s);
        let alpha = rho * dot(s, &q);
        q.iter_mut().zip(y).for_each(|(qi, yi)| *qi -= alpha * yi);
        alphas.push((alpha, rho));
    }

    let gamma = match pairs.back() {
        Some((s, y)) => dot(s, y) / dot(y, y),
        None => 1.0 / norm(g).max(1.0),
    };
    let mut r: Vec<f64> = q.iter().map(|v| gamma * v).collect();

    for ((s, y), (alpha, rho)) in pairs.iter().zip(alphas.into_iter().rev()) {
        let beta = rho * dot(y, &r);
        r.iter_mut().zip(s).for_each(|(ri, si)| *ri += si * (alpha - beta));
    }
    r
}

impl Optimizer for Lbfgs {
    fn name(&self) -> &'static str {
        "lbfgs"
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult> {
        check_budget(self.name(), self.maxiter)?;
        let mut tracker = Tracker::new(objective, usize::MAX, &initial_params);
        let mut x = initial_params;
        let mut fx = tracker.evaluate(&x)?;
        let mut g = self.gradient(&mut tracker, &x)?;
        let mut pairs: VecDeque<(Vec<f64>, Vec<f64>)> = VecDeque::with_capacity(self.memory + 1);

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.maxiter {
            if g.iter().all(|v| v.abs() <= self.gtol) {
                converged = true;
                break;
            }
            iterations += 1;

            let mut direction: Vec<f64> = inverse_hessian_times(&pairs, &g).iter().map(|v| -v).collect();
            let mut slope = dot(&g, &direction);
            if slope >= 0.0 {
                // lost positive definiteness; restart from steepest descent
                direction = g.iter().map(|v| -v).collect();
                slope = -dot(&g, &g);
                pairs.clear();
            }

            let mut t = 1.0;
            let (x_new, f_new) = loop {
                let trial: Vec<f64> = x.iter().zip(&direction).map(|(a, d)| a + t * d).collect();
                let f_trial = tracker.evaluate(&trial)?;
                if f_trial <= fx + ARMIJO * t * slope || t < MIN_STEP {
                    break (trial, f_trial);
                }
                t *= 0.5;
            };
            if t < MIN_STEP {
                debug!(iteration = iterations, value = fx, "lbfgs line search failed");
                break;
            }

            let g_new = self.gradient(&mut tracker, &x_new)?;
            let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = g_new.iter().zip(&g).map(|(a, b)| a - b).collect();
            if dot(&s, &y) > MIN_CURVATURE {
                pairs.push_back((s, y));
                if pairs.len() > self.memory {
                    pairs.pop_front();
                }
            }

            let small_decrease = (fx - f_new).abs() <= self.ftol * fx.abs().max(f_new.abs()).max(1.0);
            debug!(iteration = iterations, value = f_new, step = t, "lbfgs step");
            x = x_new;
            fx = f_new;
            g = g_new;
            if small_decrease {
                converged = true;
                break;
            }
        }

        Ok(tracker.finish(iterations, converged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizers::test_functions::{quadratic, rosenbrock};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic() {
        let mut f = |x: &[f64]| -> Result<f64> { Ok(quadratic(x)) };
        let result = Lbfgs::new().minimize(&mut f, vec![0.0, 0.0, 0.0]).unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.optimal_value, 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!(result.optimal_params[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.optimal_params[1], -2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.optimal_params[2], 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_rosenbrock() {
        let mut f = |x: &[f64]| -> Result<f64> { Ok(rosenbrock(x)) };
        let result = Lbfgs::new().minimize(&mut f, vec![-1.2, 1.0]).unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.optimal_params[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.optimal_params[1], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_two_loop_without_history_scales_gradient() {
        let pairs = VecDeque::new();
        let r = inverse_hessian_times(&pairs, &[3.0, 4.0]);
        assert_abs_diff_eq!(r[0], 0.6, epsilon = 1e-15);
        assert_abs_diff_eq!(r[1], 0.8, epsilon = 1e-15);
        // small gradients are not scaled up
        assert_eq!(inverse_hessian_times(&pairs, &[0.1, 0.0]), vec![0.1, 0.0]);
    }

    #[test]
    fn test_two_loop_recovers_diagonal_hessian() {
        // one exact curvature pair of H = diag(2, 2): y = 2 s
        let mut pairs = VecDeque::new();
        pairs.push_back((vec![1.0, 0.0], vec![2.0, 0.0]));
        let r = inverse_hessian_times(&pairs, &[2.0, 4.0]);
        assert_abs_diff_eq!(r[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r[1], 2.0, epsilon = 1e-12);
    }
}
