//! Downhill simplex method.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_budget, Objective, OptimizationResult, Optimizer, Tracker};
use crate::error::Result;

/// Nelder-Mead with the standard coefficients (reflection 1, expansion 2,
/// contraction ½, shrink ½).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMead {
    /// Maximum number of objective evaluations.
    pub maxiter: usize,
    /// Offset of the initial vertices along each axis.
    pub initial_step: f64,
    /// Simplex size at which the run is considered converged.
    pub xatol: f64,
    /// Spread of vertex values at which the run is considered converged.
    pub fatol: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            initial_step: 0.5,
            xatol: 1e-4,
            fatol: 1e-4,
        }
    }
}

impl NelderMead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    pub fn with_tolerances(mut self, xatol: f64, fatol: f64) -> Self {
        self.xatol = xatol;
        self.fatol = fatol;
        self
    }

    fn is_converged(&self, points: &[Vec<f64>], values: &[f64]) -> bool {
        let spread = values[1..]
            .iter()
            .map(|v| (v - values[0]).abs())
            .fold(0.0, f64::max);
        let size = points[1..]
            .iter()
            .flat_map(|p| p.iter().zip(&points[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        spread <= self.fatol && size <= self.xatol
    }
}

/// `c + t (p - c)` componentwise.
fn along(c: &[f64], p: &[f64], t: f64) -> Vec<f64> {
    c.iter().zip(p).map(|(ci, pi)| ci + t * (pi - ci)).collect()
}

impl Optimizer for NelderMead {
    fn name(&self) -> &'static str {
        "nelder_mead"
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult> {
        check_budget(self.name(), self.maxiter)?;
        let n = initial_params.len();
        let mut tracker = Tracker::new(objective, self.maxiter, &initial_params);

        let mut points = vec![initial_params.clone()];
        let mut values = vec![tracker.evaluate(&initial_params)?];
        for i in 0..n {
            if tracker.exhausted() {
                return Ok(tracker.finish(0, false));
            }
            let mut vertex = initial_params.clone();
            vertex[i] += self.initial_step;
            values.push(tracker.evaluate(&vertex)?);
            points.push(vertex);
        }
        if n == 0 {
            return Ok(tracker.finish(0, true));
        }

        let mut iterations = 0;
        let mut converged = false;
        while !tracker.exhausted() {
            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            points = order.iter().map(|&i| points[i].clone()).collect();
            values = order.iter().map(|&i| values[i]).collect();

            if self.is_converged(&points, &values) {
                converged = true;
                break;
            }
            iterations += 1;

            let centroid: Vec<f64> = (0..n)
                .map(|k| points[..n].iter().map(|p| p[k]).sum::<f64>() / n as f64)
                .collect();
            let worst = points[n].clone();

            let reflected = along(&centroid, &worst, -1.0);
            let f_reflected = tracker.evaluate(&reflected)?;
            if f_reflected < values[0] {
                if tracker.exhausted() {
                    points[n] = reflected;
                    values[n] = f_reflected;
                    break;
                }
                let expanded = along(&centroid, &worst, -2.0);
                let f_expanded = tracker.evaluate(&expanded)?;
                if f_expanded < f_reflected {
                    points[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    points[n] = reflected;
                    values[n] = f_reflected;
                }
                continue;
            }
            if f_reflected < values[n - 1] {
                points[n] = reflected;
                values[n] = f_reflected;
                continue;
            }
            if tracker.exhausted() {
                break;
            }

            let (contracted, accept) = if f_reflected < values[n] {
                let outside = along(&centroid, &reflected, 0.5);
                let f = tracker.evaluate(&outside)?;
                ((outside, f), f <= f_reflected)
            } else {
                let inside = along(&centroid, &worst, 0.5);
                let f = tracker.evaluate(&inside)?;
                ((inside, f), f < values[n])
            };
            if accept {
                points[n] = contracted.0;
                values[n] = contracted.1;
                continue;
            }

            for i in 1..=n {
                if tracker.exhausted() {
                    break;
                }
                points[i] = along(&points[0], &points[i], 0.5);
                values[i] = tracker.evaluate(&points[i])?;
            }
            debug!(iteration = iterations, best = values[0], "nelder-mead shrink");
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
        let result = NelderMead::new().minimize(&mut f, vec![0.0, 0.0, 0.0]).unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.optimal_value, 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(result.optimal_params[1], -2.0, epsilon = 1e-2);
    }

    #[test]
    fn test_rosenbrock() {
        let mut f = |x: &[f64]| -> Result<f64> { Ok(rosenbrock(x)) };
        let result = NelderMead::new()
            .with_tolerances(1e-8, 1e-10)
            .with_maxiter(2000)
            .minimize(&mut f, vec![-1.2, 1.0])
            .unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.optimal_params[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.optimal_params[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_budget() {
        let mut f = |x: &[f64]| -> Result<f64> { Ok(rosenbrock(x)) };
        let result = NelderMead::new()
            .with_maxiter(10)
            .minimize(&mut f, vec![-1.2, 1.0])
            .unwrap();
        assert!(!result.converged);
        assert_eq!(result.num_evaluations, 10);
    }

    #[test]
    fn test_budget_is_never_exceeded() {
        // a shrink on the last iteration must stop at the budget too
        let mut f = |x: &[f64]| -> Result<f64> { Ok(rosenbrock(x)) };
        for maxiter in 1..60 {
            let result = NelderMead::new()
                .with_maxiter(maxiter)
                .minimize(&mut f, vec![-1.2, 1.0])
                .unwrap();
            assert!(result.num_evaluations <= maxiter, "budget {maxiter}");
            assert_eq!(result.history.len(), result.num_evaluations);
        }

        let mut f = |x: &[f64]| -> Result<f64> { Ok(quadratic(x)) };
        let result = NelderMead::new()
            .with_maxiter(1000)
            .minimize(&mut f, vec![3.0; 16])
            .unwrap();
        assert!(result.num_evaluations <= 1000);
    }
}
