// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Scalar abstraction shared by the plain and differentiated transform paths.

use core::ops::{Add, Div, Mul, Neg, Sub};

/// Floor applied to bases of fractional powers, logarithms, and square roots.
/// Keeps the appearance equations finite for pure black and other degenerate
/// stimuli where the exact derivative would blow up.
pub(crate) const POW_FLOOR: f64 = 1e-12;

/// A scalar the CAM02-UCS pipeline can be evaluated on.
///
/// Implemented for `f64` (forward values) and [`crate::Dual3`] (value plus
/// three partial derivatives). The guarded operations (`powf`, `sqrt`, `ln`,
/// `clamp_min`) clamp their argument away from the singular point so both
/// implementations stay finite on the same inputs.
pub trait Channel:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Add<f64, Output = Self>
    + Mul<f64, Output = Self>
{
    /// Lifts a plain value into the scalar type with zero derivative.
    fn constant(value: f64) -> Self;

    /// The forward value, discarding any derivative information.
    fn value(self) -> f64;

    fn abs(self) -> Self;

    /// Square root, clamped so the derivative stays finite at zero.
    fn sqrt(self) -> Self;

    /// Natural logarithm of a value already guarded positive.
    fn ln(self) -> Self;

    /// `self^exponent` for a non-negative base, clamped at [`POW_FLOOR`].
    fn powf(self, exponent: f64) -> Self;

    /// Replaces values below `floor` with the constant `floor`.
    fn clamp_min(self, floor: f64) -> Self;
}

impl Channel for f64 {
    #[inline]
    fn constant(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(self) -> f64 {
        self
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(f64::max(self, POW_FLOOR))
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(f64::max(self, POW_FLOOR))
    }

    #[inline]
    fn powf(self, exponent: f64) -> Self {
        f64::powf(f64::max(self, POW_FLOOR), exponent)
    }

    #[inline]
    fn clamp_min(self, floor: f64) -> Self {
        f64::max(self, floor)
    }
}
