// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! sRGB transfer curve and the sRGB ↔ XYZ device matrices (IEC 61966-2-1,
//! D65 reference white).

use crate::channel::Channel;

/// Linear sRGB → CIE XYZ, Y normalized to [0, 1].
pub const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];

/// CIE XYZ → linear sRGB.
pub const XYZ_TO_SRGB: [[f64; 3]; 3] = [
    [3.240_454_2, -1.537_138_5, -0.498_531_4],
    [-0.969_266_0, 1.876_010_8, 0.041_556_0],
    [0.055_643_4, -0.204_025_9, 1.057_225_2],
];

/// D65 white point on the 0–100 scale used by CIECAM02.
pub const D65_WHITE: [f64; 3] = [95.047, 100.0, 108.883];

/// Decodes one gamma-encoded sRGB channel to linear light.
#[inline]
pub fn srgb_decode<T: Channel>(c: T) -> T {
    if c.value() <= 0.040_45 {
        c * (1.0 / 12.92)
    } else {
        ((c + 0.055) * (1.0 / 1.055)).powf(2.4)
    }
}

/// Encodes one linear-light channel back to gamma-encoded sRGB.
#[inline]
pub fn srgb_encode(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.max(0.0).powf(1.0 / 2.4) - 0.055
    }
}

/// Converts a gamma-encoded sRGB triple to XYZ with Y in [0, 1].
pub fn srgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    let lin = [
        srgb_decode(rgb[0]),
        srgb_decode(rgb[1]),
        srgb_decode(rgb[2]),
    ];
    apply3(&SRGB_TO_XYZ, lin)
}

/// Relative luminance (the Y component) of a gamma-encoded sRGB triple.
#[inline]
pub fn relative_luminance(rgb: [f64; 3]) -> f64 {
    srgb_to_xyz(rgb)[1]
}

/// Applies a 3×3 matrix of plain coefficients to a generic scalar triple.
#[inline]
pub fn apply3<T: Channel>(m: &[[f64; 3]; 3], v: [T; 3]) -> [T; 3] {
    [
        v[0] * m[0][0] + v[1] * m[0][1] + v[2] * m[0][2],
        v[0] * m[1][0] + v[1] * m[1][1] + v[2] * m[1][2],
        v[0] * m[2][0] + v[1] * m[2][1] + v[2] * m[2][2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_curve_round_trips() {
        for &c in &[0.0, 0.01, 0.040_45, 0.2, 0.5, 0.8, 1.0] {
            let lin: f64 = srgb_decode(c);
            assert!((srgb_encode(lin) - c).abs() < 1e-12, "channel {c}");
        }
    }

    #[test]
    fn white_maps_to_d65() {
        let xyz = srgb_to_xyz([1.0, 1.0, 1.0]);
        assert!((xyz[0] * 100.0 - D65_WHITE[0]).abs() < 1e-2);
        assert!((xyz[1] * 100.0 - D65_WHITE[1]).abs() < 1e-2);
        assert!((xyz[2] * 100.0 - D65_WHITE[2]).abs() < 1e-2);
    }

    #[test]
    fn luminance_of_mid_gray() {
        let y = relative_luminance([0.5, 0.5, 0.5]);
        assert!((y - 0.214).abs() < 1e-3);
    }
}
