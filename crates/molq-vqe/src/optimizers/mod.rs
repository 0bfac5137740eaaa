//! Classical optimizers for the variational loop.

pub mod cobyla;
pub mod lbfgs;
pub mod nelder_mead;

pub use cobyla::Cobyla;
pub use lbfgs::Lbfgs;
pub use nelder_mead::NelderMead;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VqeError};

/// Result of a minimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Parameters of the lowest value seen.
    pub optimal_params: Vec<f64>,
    /// Lowest value seen.
    pub optimal_value: f64,
    /// Optimizer iterations (steps of the method, not evaluations).
    pub num_iterations: usize,
    /// Objective evaluations.
    pub num_evaluations: usize,
    /// Objective value of every evaluation, in order.
    pub history: Vec<f64>,
    /// Whether the method's own stopping criterion was met before the
    /// evaluation budget ran out.
    pub converged: bool,
}

/// Objective handed to an optimizer. Errors abort the minimization.
pub type Objective<'a> = dyn FnMut(&[f64]) -> Result<f64> + 'a;

/// Trait for classical optimizers.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    /// Minimize `objective` starting from `initial_params`.
    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult>;
}

impl<O: Optimizer + ?Sized> Optimizer for Box<O> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> Result<OptimizationResult> {
        (**self).minimize(objective, initial_params)
    }
}

/// Wraps an objective with an evaluation budget and keeps the best point.
pub(crate) struct Tracker<'o, 'a> {
    objective: &'o mut Objective<'a>,
    max_evaluations: usize,
    best_params: Vec<f64>,
    best_value: f64,
    history: Vec<f64>,
}

impl<'o, 'a> Tracker<'o, 'a> {
    pub(crate) fn new(objective: &'o mut Objective<'a>, max_evaluations: usize, initial: &[f64]) -> Self {
        Self {
            objective,
            max_evaluations,
            best_params: initial.to_vec(),
            best_value: f64::INFINITY,
            history: Vec::new(),
        }
    }

    pub(crate) fn evaluate(&mut self, x: &[f64]) -> Result<f64> {
        let value = (self.objective)(x)?;
        if !value.is_finite() {
            return Err(VqeError::NonFiniteObjective(value));
        }
        self.history.push(value);
        if value < self.best_value {
            self.best_value = value;
            self.best_params = x.to_vec();
        }
        Ok(value)
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.evaluations() >= self.max_evaluations
    }

    pub(crate) fn finish(self, num_iterations: usize, converged: bool) -> OptimizationResult {
        OptimizationResult {
            optimal_params: self.best_params,
            optimal_value: self.best_value,
            num_iterations,
            num_evaluations: self.history.len(),
            history: self.history,
            converged,
        }
    }
}

/// A zero budget cannot even evaluate the initial point.
pub(crate) fn check_budget(optimizer: &str, maxiter: usize) -> Result<()> {
    if maxiter == 0 {
        return Err(VqeError::InvalidConfig(format!(
            "{optimizer}: maxiter must be at least 1"
        )));
    }
    Ok(())
}

pub(crate) fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Optimizer selection with its settings, as written in configuration files:
///
/// ```yaml
/// optimizer:
///   name: cobyla
///   maxiter: 500
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Cobyla(Cobyla),
    NelderMead(NelderMead),
    Lbfgs(Lbfgs),
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::Cobyla(Cobyla::default())
    }
}

impl OptimizerConfig {
    pub fn build(&self) -> Box<dyn Optimizer> {
        match self {
            OptimizerConfig::Cobyla(o) => Box::new(o.clone()),
            OptimizerConfig::NelderMead(o) => Box::new(o.clone()),
            OptimizerConfig::Lbfgs(o) => Box::new(o.clone()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OptimizerConfig::Cobyla(o) => o.name(),
            OptimizerConfig::NelderMead(o) => o.name(),
            OptimizerConfig::Lbfgs(o) => o.name(),
        }
    }

    pub fn with_maxiter(self, maxiter: usize) -> Self {
        match self {
            OptimizerConfig::Cobyla(o) => OptimizerConfig::Cobyla(o.with_maxiter(maxiter)),
            OptimizerConfig::NelderMead(o) => OptimizerConfig::NelderMead(o.with_maxiter(maxiter)),
            OptimizerConfig::Lbfgs(o) => OptimizerConfig::Lbfgs(o.with_maxiter(maxiter)),
        }
    }
}

impl FromStr for OptimizerConfig {
    type Err = VqeError;

    /// An optimizer with default settings, by name.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cobyla" => Ok(OptimizerConfig::Cobyla(Cobyla::default())),
            "nelder_mead" | "neldermead" => Ok(OptimizerConfig::NelderMead(NelderMead::default())),
            "lbfgs" | "l_bfgs" | "l_bfgs_b" => Ok(OptimizerConfig::Lbfgs(Lbfgs::default())),
            other => Err(VqeError::InvalidConfig(format!("unknown optimizer {:?}", other))),
        }
    }
}

impl fmt::Display for OptimizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
pub(crate) mod test_functions {
    /// Convex quadratic with minimum 1.5 at (1, -2, 0.5).
    pub fn quadratic(x: &[f64]) -> f64 {
        (x[0] - 1.0).powi(2) + 2.0 * (x[1] + 2.0).powi(2) + 0.5 * (x[2] - 0.5).powi(2)
            + 0.3 * (x[0] - 1.0) * (x[1] + 2.0)
            + 1.5
    }

    pub fn rosenbrock(x: &[f64]) -> f64 {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    }
}
