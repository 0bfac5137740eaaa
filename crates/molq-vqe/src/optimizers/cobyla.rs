//! Derivative-free minimization by linear approximations on a simplex.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{check_budget, Objective, OptimizationResult, Optimizer, Tracker};
use crate::error::Result;

/// Gradients below this norm count as a flat model.
const FLAT_MODEL: f64 = 1e-14;

/// Evaluations per parameter when no `maxiter` is given.
pub const EVALUATIONS_PER_PARAMETER: usize = 500;

/// COBYLA for unconstrained problems.
///
/// The method keeps `n + 1` points, fits the linear model through them and
/// steps a distance `rho` against its gradient. When a step fails to improve
/// the best point and the simplex is well shaped, `rho` is halved; the run
/// ends once a step fails at `rho = tol`.
///
/// Every halving of `rho` costs up to `n` geometry steps, so the number of
/// evaluations needed grows with the dimension. Without an explicit
/// `maxiter` the budget is [`EVALUATIONS_PER_PARAMETER`] per parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cobyla {
    /// Maximum number of objective evaluations, see [`Cobyla::budget`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxiter: Option<usize>,
    /// Initial trust-region radius.
    pub rhobeg: f64,
    /// Final trust-region radius.
    pub tol: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: None,
            rhobeg: 1.0,
            tol: 1e-4,
        }
    }
}

impl Cobyla {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = Some(maxiter);
        self
    }

    pub fn with_rhobeg(mut self, rhobeg: f64) -> Self {
        self.rhobeg = rhobeg;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Evaluation budget for a problem with `num_params` parameters.
    pub fn budget(&self, num_params: usize) -> usize {
        self.maxiter.unwrap_or(EVALUATIONS_PER_PARAMETER * num_params.max(1))
    }
}

/// Simplex vertices with their values; vertex 0 is kept at the best value.
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    fn move_best_first(&mut self) {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if v < self.values[best] {
                best = i;
            }
        }
        self.points.swap(0, best);
        self.values.swap(0, best);
    }

    /// Rows are the edges from the best vertex.
    fn edges(&self) -> DMatrix<f64> {
        let n = self.points[0].len();
        let base = &self.points[0];
        DMatrix::from_fn(n, n, |i, k| self.points[i + 1][k] - base[k])
    }

    fn replace(&mut self, vertex: usize, point: Vec<f64>, value: f64) {
        self.points[vertex] = point;
        self.values[vertex] = value;
    }
}

fn solve(matrix: &DMatrix<f64>, rhs: DVector<f64>) -> Option<DVector<f64>> {
    matrix
        .clone()
        .lu()
        .solve(&rhs)
        .filter(|x| x.iter().all(|v| v.is_finite()))
}

fn argmax_by(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, v) in values.enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best.0
}

fn offset(base: &[f64], step: &[f64]) -> Vec<f64> {
    base.iter().zip(step).map(|(b, s)| b + s).collect()
}

impl Optimizer for Cobyla {
    fn name(&self) -> &'static str {
        "cobyla"
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult> {
        let n = initial_params.len();
        let budget = self.budget(n);
        check_budget(self.name(), budget)?;
        let mut tracker = Tracker::new(objective, budget, &initial_params);

        let f0 = tracker.evaluate(&initial_params)?;
        let mut simplex = Simplex {
            points: vec![initial_params.clone()],
            values: vec![f0],
        };
        for i in 0..n {
            if tracker.exhausted() {
                return Ok(tracker.finish(0, false));
            }
            let mut vertex = initial_params.clone();
            vertex[i] += self.rhobeg;
            let value = tracker.evaluate(&vertex)?;
            simplex.points.push(vertex);
            simplex.values.push(value);
        }
        if n == 0 {
            return Ok(tracker.finish(0, true));
        }

        let rho_end = self.tol.min(self.rhobeg);
        let mut rho = self.rhobeg;
        let mut iterations = 0;
        let mut converged = false;

        while !tracker.exhausted() {
            iterations += 1;
            simplex.move_best_first();
            let best = simplex.points[0].clone();
            let best_value = simplex.values[0];

            let edges = simplex.edges();
            let differences =
                DVector::from_iterator(n, simplex.values[1..].iter().map(|v| v - best_value));
            let gradient = solve(&edges, differences);
            let lengths: Vec<f64> = edges.row_iter().map(|row| row.norm()).collect();
            let farthest = argmax_by(lengths.iter().copied());

            // Geometry step: rebuild the farthest vertex at distance rho along
            // the direction that keeps the simplex non-degenerate.
            if gradient.is_none() || lengths[farthest] > 2.0 * rho {
                let mut unit = DVector::zeros(n);
                unit[farthest] = 1.0;
                let direction = solve(&edges, unit.clone()).unwrap_or(unit);
                let mut step: Vec<f64> =
                    (direction.clone() * (rho / direction.norm())).iter().copied().collect();
                if let Some(g) = &gradient {
                    if g.iter().zip(&step).map(|(a, b)| a * b).sum::<f64>() > 0.0 {
                        step.iter_mut().for_each(|s| *s = -*s);
                    }
                }
                let point = offset(&best, &step);
                let value = tracker.evaluate(&point)?;
                trace!(iteration = iterations, rho, value, "cobyla geometry step");
                simplex.replace(farthest + 1, point, value);
                continue;
            }
            let Some(gradient) = gradient else { continue };

            let gradient_norm = gradient.norm();
            if gradient_norm < FLAT_MODEL {
                if rho <= rho_end {
                    converged = true;
                    break;
                }
                rho = (rho / 2.0).max(rho_end);
                continue;
            }

            let step: Vec<f64> = gradient.iter().map(|g| -rho * g / gradient_norm).collect();
            let point = offset(&best, &step);
            let value = tracker.evaluate(&point)?;
            trace!(iteration = iterations, rho, value, "cobyla trial step");

            // The vertex whose removal keeps the simplex best conditioned is
            // the one with the largest barycentric weight of the step.
            let vertex = solve(&edges.transpose(), DVector::from_vec(step))
                .map(|sigma| argmax_by(sigma.iter().map(|s| s.abs())))
                .unwrap_or(farthest)
                + 1;

            if value < best_value {
                simplex.replace(vertex, point, value);
            } else {
                if value < simplex.values[vertex] {
                    simplex.replace(vertex, point, value);
                }
                if rho <= rho_end {
                    converged = true;
                    break;
                }
                rho = (rho / 2.0).max(rho_end);
                debug!(rho, best = best_value, evaluations = tracker.evaluations(), "cobyla reduced rho");
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
        let result = Cobyla::new().minimize(&mut f, vec![0.0, 0.0, 0.0]).unwrap();
        assert!(result.converged);
        assert_abs_diff_eq!(result.optimal_value, 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(result.optimal_params[0], 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(result.optimal_params[1], -2.0, epsilon = 1e-2);
        assert_abs_diff_eq!(result.optimal_params[2], 0.5, epsilon = 1e-2);
        assert!(result.num_evaluations < 1000);
        assert_eq!(result.history.len(), result.num_evaluations);
    }

    #[test]
    fn test_budget_scales_with_dimension() {
        assert_eq!(Cobyla::new().budget(16), 8000);
        assert_eq!(Cobyla::new().budget(0), EVALUATIONS_PER_PARAMETER);
        assert_eq!(Cobyla::new().with_maxiter(40).budget(16), 40);

        let config: Cobyla = serde_json::from_str(r#"{"rhobeg": 0.5}"#).unwrap();
        assert_eq!(config.maxiter, None);
        assert!(!serde_json::to_string(&Cobyla::new()).unwrap().contains("maxiter"));
        let json = serde_json::to_string(&Cobyla::new().with_maxiter(3)).unwrap();
        assert_eq!(serde_json::from_str::<Cobyla>(&json).unwrap().maxiter, Some(3));
    }

    #[test]
    fn test_sixteen_parameters_converge_within_default_budget() {
        // sixteen curvatures from 0.1 to 2.35
        let mut f = |x: &[f64]| -> Result<f64> {
            Ok(x.iter()
                .enumerate()
                .map(|(i, v)| (0.1 + 0.15 * i as f64) * (v - 0.5).powi(2))
                .sum())
        };
        let result = Cobyla::new().minimize(&mut f, vec![1.0; 16]).unwrap();
        assert!(result.converged);
        assert!(result.num_evaluations <= 8000);
        assert!(result.optimal_value < 1e-5, "{}", result.optimal_value);
        for v in &result.optimal_params {
            assert_abs_diff_eq!(*v, 0.5, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_evaluation_cap() {
        let mut f = |x: &[f64]| -> Result<f64> { Ok(rosenbrock(x)) };
        let result = Cobyla::new()
            .with_maxiter(40)
            .minimize(&mut f, vec![-1.2, 1.0])
            .unwrap();
        assert_eq!(result.num_evaluations, 40);
        assert!(!result.converged);
        // the best point seen is reported, not the last one
        let min = result.history.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(result.optimal_value, min);
        assert!(result.optimal_value < rosenbrock(&[-1.2, 1.0]));
    }

    #[test]
    fn test_deterministic() {
        let run = || {
            let mut f = |x: &[f64]| -> Result<f64> { Ok(rosenbrock(x) + x[0].sin()) };
            Cobyla::new()
                .with_maxiter(200)
                .minimize(&mut f, vec![0.3, -0.4])
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_initial_simplex_layout() {
        let mut seen = Vec::new();
        let mut f = |x: &[f64]| -> Result<f64> {
            seen.push(x.to_vec());
            Ok(quadratic(x))
        };
        Cobyla::new()
            .with_rhobeg(0.5)
            .with_maxiter(4)
            .minimize(&mut f, vec![0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(
            seen,
            vec![
                vec![0.0, 0.0, 0.0],
                vec![0.5, 0.0, 0.0],
                vec![0.0, 0.5, 0.0],
                vec![0.0, 0.0, 0.5]
            ]
        );
    }
}
