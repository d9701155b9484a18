// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Projected first-order minimization.
//!
//! [`ProjectedAdam`] is an Adam-family solver with two modifications that
//! matter for box-constrained color optimization: every raw update is
//! followed by a projection back onto the feasible set, and the first-moment
//! accumulator is reset whenever the search direction stops descending (loss
//! increase or gradient reversal). The projection makes the effective loss
//! landscape non-smooth at the constraint boundary; stale momentum there
//! routinely drives the iterate the wrong way, which is what the restart
//! heuristic cuts off.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors emitted by the solver.
#[derive(Debug, Error)]
pub enum OptimError {
    #[error("step size must be positive and finite, got {value}")]
    InvalidStepSize { value: f64 },
    #[error("decay parameter {name} must lie in (0, 1), got {value}")]
    InvalidDecay { name: &'static str, value: f64 },
    #[error("objective produced a non-finite {what} at iteration {iteration}")]
    NonFinite {
        what: &'static str,
        iteration: usize,
    },
    #[error("objective gradient length {got} does not match parameter length {expected}")]
    GradientLength { expected: usize, got: usize },
}

/// Hyperparameters of [`ProjectedAdam`].
///
/// The decay parameters deviate from the textbook b1 = 0.9 / b2 = 0.999;
/// the heavier first moment pairs better with the restart heuristic on
/// projected problems.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdamConfig {
    pub step_size: f64,
    pub b1: f64,
    pub b2: f64,
    /// Mean absolute parameter change below which the run counts as
    /// converged.
    pub tolerance: f64,
    pub max_iter: usize,
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            step_size: 1e-3,
            b1: 0.98,
            b2: 0.998,
            tolerance: 1e-6,
            max_iter: 10_000,
        }
    }
}

impl AdamConfig {
    fn validate(&self) -> Result<(), OptimError> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(OptimError::InvalidStepSize {
                value: self.step_size,
            });
        }
        for (name, value) in [("b1", self.b1), ("b2", self.b2)] {
            if !(0.0..1.0).contains(&value) {
                return Err(OptimError::InvalidDecay { name, value });
            }
        }
        Ok(())
    }
}

/// Outcome of one [`ProjectedAdam::step`] call.
///
/// Both terminal states are normal completion; the caller reads the final
/// iterate either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Continue,
    Converged,
    MaxIterReached,
}

impl StepStatus {
    /// Whether the solver has reached a terminal state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, StepStatus::Continue)
    }
}

/// Adam with projection and adaptive restart, driven step by step.
///
/// The solver owns the parameter vector for the duration of the run and
/// mutates it in place. It is forward-only: each `step()` call advances the
/// iteration counter, and after a terminal status further calls keep
/// returning that status without touching the iterate.
#[derive(Debug)]
pub struct ProjectedAdam {
    config: AdamConfig,
    x: Vec<f64>,
    m1: Vec<f64>,
    m2: Vec<f64>,
    iteration: usize,
    last_loss: f64,
    last_grad: Vec<f64>,
    scratch: Vec<f64>,
    finished: Option<StepStatus>,
}

impl ProjectedAdam {
    pub fn new(initial: Vec<f64>, config: AdamConfig) -> Result<Self, OptimError> {
        config.validate()?;
        let n = initial.len();
        Ok(Self {
            config,
            x: initial,
            m1: vec![0.0; n],
            m2: vec![0.0; n],
            iteration: 0,
            last_loss: f64::INFINITY,
            last_grad: vec![0.0; n],
            scratch: vec![0.0; n],
            finished: None,
        })
    }

    /// Current iterate.
    pub fn params(&self) -> &[f64] {
        &self.x
    }

    /// Consumes the solver, returning the final iterate.
    pub fn into_params(self) -> Vec<f64> {
        self.x
    }

    /// Number of completed iterations.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Loss observed at the start of the most recent iteration.
    pub fn last_loss(&self) -> f64 {
        self.last_loss
    }

    /// Advances the solver by one iteration.
    ///
    /// `objective` evaluates loss and gradient at the current iterate;
    /// `project` clamps the raw update back onto the feasible set.
    pub fn step<F, P>(&mut self, objective: F, mut project: P) -> Result<StepStatus, OptimError>
    where
        F: FnOnce(&[f64]) -> (f64, Vec<f64>),
        P: FnMut(&mut [f64]),
    {
        if let Some(status) = self.finished {
            return Ok(status);
        }
        if self.iteration >= self.config.max_iter {
            self.finished = Some(StepStatus::MaxIterReached);
            return Ok(StepStatus::MaxIterReached);
        }
        self.iteration += 1;

        let (loss, grad) = objective(&self.x);
        if !loss.is_finite() {
            return Err(OptimError::NonFinite {
                what: "loss",
                iteration: self.iteration,
            });
        }
        if grad.len() != self.x.len() {
            return Err(OptimError::GradientLength {
                expected: self.x.len(),
                got: grad.len(),
            });
        }
        if grad.iter().any(|g| !g.is_finite()) {
            return Err(OptimError::NonFinite {
                what: "gradient",
                iteration: self.iteration,
            });
        }

        // Adaptive restart: drop momentum once the direction stops
        // descending.
        let reversed = self
            .last_grad
            .iter()
            .zip(&grad)
            .map(|(a, b)| a * b)
            .sum::<f64>()
            < 0.0;
        if loss > self.last_loss || reversed {
            self.m1.iter_mut().for_each(|m| *m = 0.0);
        }

        let AdamConfig { b1, b2, .. } = self.config;
        for ((m1, m2), g) in self.m1.iter_mut().zip(&mut self.m2).zip(&grad) {
            *m1 = b1 * *m1 + (1.0 - b1) * g;
            *m2 = b2 * *m2 + (1.0 - b2) * g * g;
        }

        let i = self.iteration as i32;
        let step = self.config.step_size * (1.0 - b2.powi(i)).sqrt() / (1.0 - b1.powi(i));

        self.scratch.copy_from_slice(&self.x);
        for ((x, m1), m2) in self.x.iter_mut().zip(&self.m1).zip(&self.m2) {
            *x -= step * m1 / (m2.sqrt() + 1e-8);
        }
        project(&mut self.x);

        let mean_change = self
            .scratch
            .iter()
            .zip(&self.x)
            .map(|(old, new)| (old - new).abs())
            .sum::<f64>()
            / self.x.len().max(1) as f64;

        self.last_loss = loss;
        self.last_grad = grad;

        if mean_change < self.config.tolerance {
            self.finished = Some(StepStatus::Converged);
            Ok(StepStatus::Converged)
        } else {
            Ok(StepStatus::Continue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(center: &[f64]) -> impl Fn(&[f64]) -> (f64, Vec<f64>) + '_ {
        move |x: &[f64]| {
            let loss = x
                .iter()
                .zip(center)
                .map(|(x, c)| (x - c) * (x - c))
                .sum::<f64>();
            let grad = x.iter().zip(center).map(|(x, c)| 2.0 * (x - c)).collect();
            (loss, grad)
        }
    }

    fn clamp_unit(x: &mut [f64]) {
        for v in x.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
    }

    fn run(opt: &mut ProjectedAdam, center: &[f64]) -> StepStatus {
        loop {
            let status = opt.step(quadratic(center), clamp_unit).unwrap();
            if status.is_terminal() {
                return status;
            }
        }
    }

    #[test]
    fn converges_to_interior_minimum() {
        let center = [0.25, 0.5, 0.75];
        let mut opt = ProjectedAdam::new(vec![0.5; 3], AdamConfig::default()).unwrap();
        let status = run(&mut opt, &center);
        assert_eq!(status, StepStatus::Converged);
        assert!(opt.iterations() <= AdamConfig::default().max_iter);
        for (x, c) in opt.params().iter().zip(&center) {
            assert!((x - c).abs() < 1e-2, "got {x}, wanted {c}");
        }
    }

    #[test]
    fn projection_pins_exterior_minimum_to_the_boundary() {
        let center = [1.5, -0.5];
        let mut opt = ProjectedAdam::new(vec![0.5; 2], AdamConfig::default()).unwrap();
        run(&mut opt, &center);
        assert!((opt.params()[0] - 1.0).abs() < 1e-6);
        assert!(opt.params()[1].abs() < 1e-6);
    }

    #[test]
    fn iteration_cap_is_a_normal_completion() {
        let config = AdamConfig {
            max_iter: 5,
            tolerance: 0.0,
            ..AdamConfig::default()
        };
        let mut opt = ProjectedAdam::new(vec![0.5], config).unwrap();
        let mut steps = 0;
        loop {
            let status = opt.step(quadratic(&[0.9]), clamp_unit).unwrap();
            steps += 1;
            if status.is_terminal() {
                assert_eq!(status, StepStatus::MaxIterReached);
                break;
            }
            assert!(steps <= 6, "solver failed to stop");
        }
        assert_eq!(opt.iterations(), 5);
        // terminal status is sticky
        let again = opt.step(quadratic(&[0.9]), clamp_unit).unwrap();
        assert_eq!(again, StepStatus::MaxIterReached);
    }

    #[test]
    fn non_finite_loss_is_reported() {
        let mut opt = ProjectedAdam::new(vec![0.5], AdamConfig::default()).unwrap();
        let err = opt
            .step(|_| (f64::NAN, vec![0.0]), clamp_unit)
            .unwrap_err();
        assert!(matches!(err, OptimError::NonFinite { what: "loss", .. }));
    }

    #[test]
    fn rejects_bad_hyperparameters() {
        let config = AdamConfig {
            b1: 1.5,
            ..AdamConfig::default()
        };
        assert!(ProjectedAdam::new(vec![0.0], config).is_err());
    }
}
