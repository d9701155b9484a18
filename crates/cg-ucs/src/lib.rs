// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! CAM02-UCS colorspace transforms in pure Rust.
//!
//! The crate maps sRGB stimuli into the CAM02-UCS perceptually uniform
//! appearance space (lightness J', rectangular a'/b' or polar M'/h) under a
//! fixed set of viewing conditions, and back. The forward pipeline is written
//! once over a scalar abstraction ([`Channel`]) so the exact same arithmetic
//! runs on plain `f64` values and on forward-mode dual numbers ([`Dual3`]),
//! which is how the analytic Jacobian of the sRGB → UCS map is obtained
//! without an autodiff framework.
//!
//! Everything that depends only on the viewing conditions (degree of
//! adaptation, luminance-level factors, the folded stimulus matrix, the
//! achromatic response of the white point) is precomputed once by
//! [`ViewingConditions::bake`]; per-stimulus work is a single 3×3 matrix
//! apply plus the CIECAM02 appearance equations.

pub mod cam02;
pub mod channel;
pub mod dual;
pub mod srgb;

pub use cam02::{
    jab_to_jmh, jab_to_srgb, jmh_to_jab, srgb_to_jab, srgb_to_jab_with_jacobian, srgb_to_jmh,
    BakedConditions, Jab, Jmh, Surround, ViewingConditions,
};
pub use channel::Channel;
pub use dual::Dual3;
pub use srgb::{relative_luminance, srgb_decode, srgb_encode, srgb_to_xyz};
