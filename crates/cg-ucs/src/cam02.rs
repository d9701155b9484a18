// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! CIECAM02 appearance model and the CAM02-UCS uniform space on top of it.
//!
//! The forward path runs on any [`Channel`] scalar. It deliberately never
//! calls `atan2`: the hue enters the equations only through cos h, sin h and
//! the eccentricity cos(h + 2), all of which are formed from a/‖ab‖ and
//! b/‖ab‖ with the angle-addition identity. That keeps the differentiated
//! path free of trigonometric singularities on the neutral axis.

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::dual::Dual3;
use crate::srgb::{apply3, srgb_decode, srgb_encode, srgb_to_xyz, D65_WHITE, SRGB_TO_XYZ, XYZ_TO_SRGB};

/// CAT02 chromatic adaptation matrix.
const CAT02: [[f64; 3]; 3] = [
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
];

const CAT02_INV: [[f64; 3]; 3] = [
    [1.096_123_820_835_514, -0.278_869_000_218_287, 0.182_745_179_382_773],
    [0.454_369_041_975_359, 0.473_533_154_307_412, 0.072_097_803_717_229],
    [-0.009_627_608_738_429, -0.005_698_031_216_113, 1.015_325_639_954_543],
];

/// Hunt–Pointer–Estevez cone response matrix (normalized to D65).
const HPE: [[f64; 3]; 3] = [
    [0.38971, 0.68898, -0.07868],
    [-0.22981, 1.18340, 0.04641],
    [0.0, 0.0, 1.0],
];

// cos(2) and sin(2); the eccentricity term cos(h + 2 rad) expanded.
const ECC_COS: f64 = -0.416_146_836_547_142_4;
const ECC_SIN: f64 = 0.909_297_426_825_681_7;

/// CAM02-UCS rectangular coordinates: lightness J' and opponent a'/b'.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Jab {
    pub j: f64,
    pub a: f64,
    pub b: f64,
}

/// CAM02-UCS polar coordinates: lightness J', colorfulness M', hue angle h
/// in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Jmh {
    pub j: f64,
    pub m: f64,
    pub h: f64,
}

/// Surround parameters of the viewing environment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surround {
    pub f: f64,
    pub c: f64,
    pub nc: f64,
}

impl Surround {
    pub const AVERAGE: Surround = Surround {
        f: 1.0,
        c: 0.69,
        nc: 1.0,
    };
    pub const DIM: Surround = Surround {
        f: 0.9,
        c: 0.59,
        nc: 0.9,
    };
    pub const DARK: Surround = Surround {
        f: 0.8,
        c: 0.525,
        nc: 0.8,
    };
}

/// The viewing environment the appearance model is evaluated under.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewingConditions {
    /// Reference white on the 0–100 XYZ scale.
    pub white: [f64; 3],
    /// Adapting field luminance L_A in cd/m².
    pub adapting_luminance: f64,
    /// Background relative luminance Y_b on the 0–100 scale.
    pub background_luminance: f64,
    pub surround: Surround,
}

impl ViewingConditions {
    /// Conditions for an sRGB display viewed against the given background
    /// color: D65 white, L_A = 20 cd/m², average surround.
    pub fn srgb_display(background: [f64; 3]) -> Self {
        Self {
            white: D65_WHITE,
            adapting_luminance: 20.0,
            background_luminance: srgb_to_xyz(background)[1] * 100.0,
            surround: Surround::AVERAGE,
        }
    }

    /// Precomputes every stimulus-independent quantity.
    pub fn bake(self) -> BakedConditions {
        let yw = self.white[1];
        let la = self.adapting_luminance;
        let surround = self.surround;

        let rgb_w = apply3(&CAT02, self.white);
        let d = (surround.f * (1.0 - (1.0 / 3.6) * ((-la - 42.0) / 92.0).exp()))
            .clamp(0.0, 1.0);
        let d_scale = [
            d * yw / rgb_w[0] + 1.0 - d,
            d * yw / rgb_w[1] + 1.0 - d,
            d * yw / rgb_w[2] + 1.0 - d,
        ];

        // CAT02 → per-channel adaptation → back to XYZ → HPE cones, folded
        // into a single matrix applied to XYZ on the 0–100 scale.
        let mut adapted_cat = CAT02;
        for (row, scale) in adapted_cat.iter_mut().zip(d_scale) {
            for value in row.iter_mut() {
                *value *= scale;
            }
        }
        let fold = mat_mul(&HPE, &mat_mul(&CAT02_INV, &adapted_cat));
        let fold_inv = mat_inv(&fold);

        let mut rgb_fold = mat_mul(&fold, &SRGB_TO_XYZ);
        for row in rgb_fold.iter_mut() {
            for value in row.iter_mut() {
                *value *= 100.0;
            }
        }

        let k = 1.0 / (5.0 * la + 1.0);
        let k4 = k * k * k * k;
        let fl = 0.2 * k4 * 5.0 * la + 0.1 * (1.0 - k4) * (1.0 - k4) * (5.0 * la).cbrt();

        let n = self.background_luminance / yw;
        let z = 1.48 + n.sqrt();
        let nbb = 0.725 * (1.0 / n).powf(0.2);
        let ncb = nbb;

        let fl_over_100 = fl / 100.0;
        let lms_w = apply3(&fold, self.white);
        let aw = (2.0 * adapt(lms_w[0], fl_over_100)
            + adapt(lms_w[1], fl_over_100)
            + 0.05 * adapt(lms_w[2], fl_over_100)
            - 0.305)
            * nbb;

        BakedConditions {
            conditions: self,
            fl,
            fl_root4: fl.powf(0.25),
            n,
            z,
            nbb,
            cz: surround.c * z,
            aw,
            chroma_factor: (1.64 - 0.29_f64.powf(n)).powf(0.73),
            t_factor: 50000.0 / 13.0 * surround.nc * ncb,
            rgb_fold,
            fold_inv,
        }
    }
}

impl Default for ViewingConditions {
    fn default() -> Self {
        Self::srgb_display([0.5, 0.5, 0.5])
    }
}

/// Stimulus-independent constants of one set of viewing conditions.
#[derive(Clone, Copy, Debug)]
pub struct BakedConditions {
    pub conditions: ViewingConditions,
    pub fl: f64,
    pub fl_root4: f64,
    pub n: f64,
    pub z: f64,
    pub nbb: f64,
    pub cz: f64,
    pub aw: f64,
    pub chroma_factor: f64,
    pub t_factor: f64,
    /// Linear sRGB → adapted HPE cones, with the ×100 XYZ scale folded in.
    pub rgb_fold: [[f64; 3]; 3],
    /// Adapted HPE cones → XYZ on the 0–100 scale.
    pub fold_inv: [[f64; 3]; 3],
}

/// CIECAM02 post-adaptation nonlinearity.
#[inline]
fn adapt<T: Channel>(x: T, fl_over_100: f64) -> T {
    let sign = if x.value() < 0.0 { -1.0 } else { 1.0 };
    let t = (x.abs() * fl_over_100).powf(0.42);
    let response = t * 400.0 / (t + 27.13);
    response * sign + 0.1
}

/// Inverse of [`adapt`].
#[inline]
fn adapt_inv(y: f64, fl: f64) -> f64 {
    let shifted = y - 0.1;
    let mag = shifted.abs();
    let base = 27.13 * mag / (400.0 - mag).max(1e-10);
    shifted.signum() * (100.0 / fl) * base.powf(1.0 / 0.42)
}

/// Appearance equations from adapted cone responses to UCS J'a'b'.
fn appearance<T: Channel>(lms: [T; 3], bc: &BakedConditions) -> [T; 3] {
    let fl_over_100 = bc.fl / 100.0;
    let ra = adapt(lms[0], fl_over_100);
    let ga = adapt(lms[1], fl_over_100);
    let ba = adapt(lms[2], fl_over_100);

    let a = ra - ga * (12.0 / 11.0) + ba * (1.0 / 11.0);
    let b = (ra + ga - ba * 2.0) * (1.0 / 9.0);

    let achromatic = (ra * 2.0 + ga + ba * 0.05 + (-0.305)) * bc.nbb;
    let j = (achromatic.clamp_min(1e-10) * (1.0 / bc.aw)).powf(bc.cz) * 100.0;

    let norm = (a * a + b * b).clamp_min(1e-18).sqrt();
    let cos_h = a / norm;
    let sin_h = b / norm;
    let e_t = (cos_h * ECC_COS - sin_h * ECC_SIN + 3.8) * 0.25;

    let denom = (ra + ga + ba * 1.05).clamp_min(1e-10);
    let t = e_t * norm * bc.t_factor / denom;
    let chroma = t.powf(0.9) * (j * 0.01).sqrt() * bc.chroma_factor;
    let m = chroma * bc.fl_root4;
    let mp = (m * 0.0228 + 1.0).ln() * (1.0 / 0.0228);

    let jp = j * 1.7 / (j * 0.007 + 1.0);
    [jp, mp * cos_h, mp * sin_h]
}

fn transform<T: Channel>(rgb: [T; 3], bc: &BakedConditions) -> [T; 3] {
    let lin = [
        srgb_decode(rgb[0]),
        srgb_decode(rgb[1]),
        srgb_decode(rgb[2]),
    ];
    appearance(apply3(&bc.rgb_fold, lin), bc)
}

/// Maps a gamma-encoded sRGB triple to CAM02-UCS J'a'b'.
pub fn srgb_to_jab(rgb: [f64; 3], bc: &BakedConditions) -> Jab {
    let [j, a, b] = transform(rgb, bc);
    Jab { j, a, b }
}

/// Maps a gamma-encoded sRGB triple to CAM02-UCS J'M'h.
pub fn srgb_to_jmh(rgb: [f64; 3], bc: &BakedConditions) -> Jmh {
    jab_to_jmh(srgb_to_jab(rgb, bc))
}

/// Forward value together with the 3×3 Jacobian ∂(J',a',b')/∂(r,g,b).
pub fn srgb_to_jab_with_jacobian(
    rgb: [f64; 3],
    bc: &BakedConditions,
) -> ([f64; 3], [[f64; 3]; 3]) {
    let out = transform(
        [
            Dual3::seeded(rgb[0], 0),
            Dual3::seeded(rgb[1], 1),
            Dual3::seeded(rgb[2], 2),
        ],
        bc,
    );
    (
        [out[0].value, out[1].value, out[2].value],
        [out[0].grad, out[1].grad, out[2].grad],
    )
}

/// Rectangular → polar, hue in degrees normalized to [0, 360).
pub fn jab_to_jmh(jab: Jab) -> Jmh {
    let m = jab.a.hypot(jab.b);
    let mut h = jab.b.atan2(jab.a).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    Jmh { j: jab.j, m, h }
}

/// Polar → rectangular.
pub fn jmh_to_jab(jmh: Jmh) -> Jab {
    let (sin_h, cos_h) = jmh.h.to_radians().sin_cos();
    Jab {
        j: jmh.j,
        a: jmh.m * cos_h,
        b: jmh.m * sin_h,
    }
}

/// Full CIECAM02 inverse from UCS J'a'b' back to gamma-encoded sRGB.
///
/// Sanity-check and test-oracle path; the optimizer never calls it. The
/// result is not clamped to [0, 1], so out-of-gamut appearance coordinates
/// are visible to the caller.
pub fn jab_to_srgb(jab: Jab, bc: &BakedConditions) -> [f64; 3] {
    let jp = jab.j.min(240.0);
    if jp <= 1e-8 {
        return [0.0, 0.0, 0.0];
    }
    let mp = jab.a.hypot(jab.b);
    let h = jab.b.atan2(jab.a);

    let j = jp / (1.7 - 0.007 * jp);
    let m = (0.0228 * mp).exp_m1() / 0.0228;
    let chroma = m / bc.fl_root4;
    let t = (chroma / ((j / 100.0).sqrt() * bc.chroma_factor))
        .max(0.0)
        .powf(1.0 / 0.9);

    let achromatic = bc.aw * (j / 100.0).powf(1.0 / bc.cz);
    let p2 = achromatic / bc.nbb + 0.305;

    let (a, b) = if t < 1e-10 {
        (0.0, 0.0)
    } else {
        let e_t = 0.25 * ((h + 2.0).cos() + 3.8);
        let p1 = bc.t_factor * e_t / t;
        let p3 = 21.0 / 20.0;
        let (sin_h, cos_h) = h.sin_cos();
        if sin_h.abs() >= cos_h.abs() {
            let p4 = p1 / sin_h;
            let b = p2 * (2.0 + p3) * (460.0 / 1403.0)
                / (p4 + (2.0 + p3) * (220.0 / 1403.0) * (cos_h / sin_h) - 27.0 / 1403.0
                    + p3 * (6300.0 / 1403.0));
            (b * cos_h / sin_h, b)
        } else {
            let p5 = p1 / cos_h;
            let a = p2 * (2.0 + p3) * (460.0 / 1403.0)
                / (p5 + (2.0 + p3) * (220.0 / 1403.0)
                    - (27.0 / 1403.0 - p3 * (6300.0 / 1403.0)) * (sin_h / cos_h));
            (a, a * sin_h / cos_h)
        }
    };

    let ra = (460.0 * p2 + 451.0 * a + 288.0 * b) / 1403.0;
    let ga = (460.0 * p2 - 891.0 * a - 261.0 * b) / 1403.0;
    let ba = (460.0 * p2 - 220.0 * a - 6300.0 * b) / 1403.0;

    let lms = [
        adapt_inv(ra, bc.fl),
        adapt_inv(ga, bc.fl),
        adapt_inv(ba, bc.fl),
    ];
    let xyz = apply3(&bc.fold_inv, lms);
    let lin = apply3(&XYZ_TO_SRGB, [xyz[0] / 100.0, xyz[1] / 100.0, xyz[2] / 100.0]);
    [
        srgb_encode(lin[0]),
        srgb_encode(lin[1]),
        srgb_encode(lin[2]),
    ]
}

fn mat_mul(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for (k, b_row) in b.iter().enumerate() {
                out[i][j] += a[i][k] * b_row[j];
            }
        }
    }
    out
}

fn mat_inv(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    let inv_det = 1.0 / det;
    [
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ]
}
