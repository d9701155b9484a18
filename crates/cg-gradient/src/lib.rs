// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Perceptually smooth color gradients by optimization in CAM02-UCS.
//!
//! Given at least two color stops, the engine builds a smooth reference
//! curve through their appearance-space coordinates (monotone per axis, or
//! periodic for closed gradients, with hue unwrapping so interpolation
//! takes the short arc), then runs projected Adam over the sRGB cube to
//! find the gradient whose appearance — and whose step-to-step appearance
//! *changes* — best match that reference. Optimizing in appearance space
//! is the whole point: interpolating raw RGB or HSV produces banding and
//! muddy midpoints that no amount of post-smoothing fixes.
//!
//! Each request is self-contained; the only process-wide state is the
//! [`shared_loss`] evaluator, built once and shared read-only.
//!
//! ```no_run
//! use cg_gradient::{make_gradient, ColorStop, GradientOptions};
//!
//! let stops = vec![
//!     ColorStop::from_rgb8(0.0, [51, 51, 127]),
//!     ColorStop::from_rgb8(1.0 / 3.0, [51, 127, 51]),
//!     ColorStop::from_rgb8(1.0, [255, 102, 51]),
//! ];
//! let result = make_gradient(&stops, &GradientOptions::default(), None)?;
//! println!("{}", result.summary);
//! # Ok::<(), cg_gradient::GradientError>(())
//! ```

pub mod driver;
pub mod error;
pub mod loss;
pub mod parse;
pub mod progress;
pub mod render;
pub mod spline;
pub mod stops;
pub mod target;

pub use driver::{make_gradient, make_gradient_with, GradientOptions, GradientResult, MAX_STEPS};
pub use error::GradientError;
pub use loss::{shared_loss, Background, CompiledLoss, DEFAULT_DIFF_WEIGHT};
pub use parse::{parse_stops, ParseError};
pub use progress::{ChannelSink, Progress, ProgressSink};
pub use render::{to_ansi, to_csv, to_html};
pub use stops::{validate_stops, ColorStop};
pub use target::TargetCurve;

pub use cg_opt::{AdamConfig, StepStatus};
