// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use serde::{Deserialize, Serialize};

use crate::error::GradientError;

/// One anchor color of a gradient: a position along the curve parameter and
/// an sRGB color with channels in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub rgb: [f64; 3],
}

impl ColorStop {
    pub fn new(position: f64, rgb: [f64; 3]) -> Self {
        Self { position, rgb }
    }

    /// Builds a stop from 8-bit channel values.
    pub fn from_rgb8(position: f64, rgb: [u8; 3]) -> Self {
        Self {
            position,
            rgb: [
                rgb[0] as f64 / 255.0,
                rgb[1] as f64 / 255.0,
                rgb[2] as f64 / 255.0,
            ],
        }
    }
}

/// Checks the invariants the engine relies on: at least two stops, channels
/// inside [0, 1], strictly increasing finite positions.
pub fn validate_stops(stops: &[ColorStop]) -> Result<(), GradientError> {
    if stops.len() < 2 {
        return Err(GradientError::TooFewStops { got: stops.len() });
    }
    for (index, stop) in stops.iter().enumerate() {
        if !stop.position.is_finite() {
            return Err(GradientError::NonMonotonePositions { index });
        }
        for (channel, &value) in stop.rgb.iter().enumerate() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GradientError::ChannelOutOfRange {
                    index,
                    channel,
                    value,
                });
            }
        }
    }
    for (index, pair) in stops.windows(2).enumerate() {
        if pair[1].position <= pair[0].position {
            return Err(GradientError::NonMonotonePositions { index: index + 1 });
        }
    }
    Ok(())
}
