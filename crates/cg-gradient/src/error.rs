// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

use crate::driver::MAX_STEPS;
use crate::parse::ParseError;

/// Errors a gradient request can fail with.
///
/// Every variant is detected before or during a single request and never
/// affects the shared loss evaluator or other in-flight requests.
#[derive(Debug, Error)]
pub enum GradientError {
    #[error("at least two color stops are required, got {got}")]
    TooFewStops { got: usize },
    #[error("step count must lie in [2, {MAX_STEPS}], got {got}")]
    StepsOutOfRange { got: usize },
    #[error("stop positions must be finite and strictly increasing (stop {index})")]
    NonMonotonePositions { index: usize },
    #[error("channel {channel} of stop {index} is outside [0, 1]: {value}")]
    ChannelOutOfRange {
        index: usize,
        channel: usize,
        value: f64,
    },
    #[error(transparent)]
    Optim(#[from] cg_opt::OptimError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
