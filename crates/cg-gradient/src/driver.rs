// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Orchestration of one gradient request.

use std::time::Instant;

use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use cg_opt::{AdamConfig, ProjectedAdam};

use crate::error::GradientError;
use crate::loss::{shared_loss, CompiledLoss};
use crate::progress::{Progress, ProgressSink};
use crate::stops::{validate_stops, ColorStop};
use crate::target::TargetCurve;

/// Hard cap on the number of output samples per request.
pub const MAX_STEPS: usize = 1024;

/// Magnitude of the uniform jitter applied to the mid-gray starting point.
/// The loss has a degenerate saddle at exact uniform gray for symmetric
/// inputs; the jitter breaks the tie.
const INIT_JITTER: f64 = 1e-8;

/// Per-request knobs of the gradient engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientOptions {
    /// Number of output colors, in [2, [`MAX_STEPS`]].
    pub steps: usize,
    /// Close the curve so the first and last output colors coincide.
    pub periodic: bool,
    pub adam: AdamConfig,
    /// Seed for the symmetry-breaking jitter; fresh entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            steps: 30,
            periodic: false,
            adam: AdamConfig::default(),
            seed: None,
        }
    }
}

/// The outcome of one completed gradient request.
#[derive(Clone, Debug, Serialize)]
pub struct GradientResult {
    /// Curve-parameter positions of the output samples.
    pub positions: Vec<f64>,
    /// Converged sRGB colors, every channel in [0, 1].
    pub colors: Vec<[f64; 3]>,
    /// Iterations the solver actually ran.
    pub iterations: usize,
    /// Loss of the returned colors.
    pub loss: f64,
    pub elapsed_seconds: f64,
    /// One-line human-readable completion report.
    pub summary: String,
}

/// Computes a perceptually smooth gradient through `stops` using the
/// process-wide shared loss evaluator.
pub fn make_gradient(
    stops: &[ColorStop],
    options: &GradientOptions,
    progress: Option<&dyn ProgressSink>,
) -> Result<GradientResult, GradientError> {
    make_gradient_with(shared_loss(), stops, options, progress)
}

/// [`make_gradient`] against an explicitly constructed evaluator, for
/// callers that need a non-default background or smoothness weight.
pub fn make_gradient_with(
    loss: &CompiledLoss,
    stops: &[ColorStop],
    options: &GradientOptions,
    progress: Option<&dyn ProgressSink>,
) -> Result<GradientResult, GradientError> {
    let started = Instant::now();

    validate_stops(stops)?;
    if !(2..=MAX_STEPS).contains(&options.steps) {
        return Err(GradientError::StepsOutOfRange { got: options.steps });
    }

    let target = TargetCurve::build(stops, options.steps, options.periodic, loss.conditions());

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let jitter = Uniform::new_inclusive(-INIT_JITTER, INIT_JITTER);
    let initial: Vec<f64> = (0..options.steps * 3)
        .map(|_| 0.5 + rng.sample(jitter))
        .collect();

    let mut solver = ProjectedAdam::new(initial, options.adam)?;
    loop {
        let status = solver.step(
            |x| loss.evaluate_flat(x, &target),
            |x| {
                for v in x.iter_mut() {
                    *v = v.clamp(0.0, 1.0);
                }
            },
        )?;
        if status.is_terminal() {
            tracing::debug!(
                ?status,
                iterations = solver.iterations(),
                "optimization finished"
            );
            break;
        }
        if solver.iterations() % 100 == 0 {
            if let Some(sink) = progress {
                sink.report(Progress {
                    iteration: solver.iterations(),
                    loss: solver.last_loss(),
                });
            }
        }
    }

    let iterations = solver.iterations();
    let colors: Vec<[f64; 3]> = solver
        .into_params()
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let (final_loss, _) = loss.evaluate(&colors, &target);
    let elapsed = started.elapsed().as_secs_f64();

    Ok(GradientResult {
        positions: target.positions().to_vec(),
        colors,
        iterations,
        loss: final_loss,
        elapsed_seconds: elapsed,
        summary: format!(
            "Loss was {final_loss:.3} after {iterations} iterations; took {elapsed:.3} seconds."
        ),
    })
}
