// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Reference curve construction in appearance space.

use cg_ucs::{jmh_to_jab, srgb_to_jmh, BakedConditions, Jmh};

use crate::spline::{Pchip, PeriodicCubic};
use crate::stops::ColorStop;

/// The appearance-space curve one optimization run steers toward.
///
/// Owned by a single run and immutable once built: sampled J'a'b'
/// coordinates plus the first differences between consecutive samples,
/// which the smoothness term of the loss compares against.
#[derive(Clone, Debug)]
pub struct TargetCurve {
    positions: Vec<f64>,
    ideal_jab: Vec<[f64; 3]>,
    ideal_diff: Vec<[f64; 3]>,
}

impl TargetCurve {
    /// Interpolates the stops' appearance coordinates at `steps` evenly
    /// spaced positions.
    ///
    /// Stops are converted to polar J'M'h, the hue sequence is unwrapped so
    /// interpolation never takes the long way around the hue wheel, and the
    /// per-axis curves are fitted monotone (PCHIP) or, for closed gradients,
    /// with a cyclic cubic spline after forcing the last sample onto the
    /// first. The caller has already validated the stop list.
    pub fn build(
        stops: &[ColorStop],
        steps: usize,
        periodic: bool,
        bc: &BakedConditions,
    ) -> Self {
        let mut jmh: Vec<Jmh> = stops.iter().map(|s| srgb_to_jmh(s.rgb, bc)).collect();
        let mut hues: Vec<f64> = jmh.iter().map(|c| c.h).collect();
        unwrap_degrees(&mut hues);
        for (sample, h) in jmh.iter_mut().zip(&hues) {
            sample.h = *h;
        }
        if periodic {
            jmh[stops.len() - 1] = jmh[0];
        }

        let xs: Vec<f64> = stops.iter().map(|s| s.position).collect();
        let axes: [Vec<f64>; 3] = [
            jmh.iter().map(|c| c.j).collect(),
            jmh.iter().map(|c| c.m).collect(),
            jmh.iter().map(|c| c.h).collect(),
        ];
        let curves: Vec<Axis> = axes
            .iter()
            .map(|ys| {
                if periodic {
                    Axis::Periodic(PeriodicCubic::new(&xs, ys))
                } else {
                    Axis::Monotone(Pchip::new(&xs, ys))
                }
            })
            .collect();

        let first = xs[0];
        let last = xs[xs.len() - 1];
        let positions: Vec<f64> = (0..steps)
            .map(|i| first + (last - first) * i as f64 / (steps - 1) as f64)
            .collect();

        let ideal_jab: Vec<[f64; 3]> = positions
            .iter()
            .map(|&t| {
                let jab = jmh_to_jab(Jmh {
                    j: curves[0].eval(t),
                    m: curves[1].eval(t),
                    h: curves[2].eval(t),
                });
                [jab.j, jab.a, jab.b]
            })
            .collect();
        let ideal_diff = ideal_jab
            .windows(2)
            .map(|w| [w[1][0] - w[0][0], w[1][1] - w[0][1], w[1][2] - w[0][2]])
            .collect();

        Self {
            positions,
            ideal_jab,
            ideal_diff,
        }
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn ideal_jab(&self) -> &[[f64; 3]] {
        &self.ideal_jab
    }

    pub fn ideal_diff(&self) -> &[[f64; 3]] {
        &self.ideal_diff
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

enum Axis {
    Monotone(Pchip),
    Periodic(PeriodicCubic),
}

impl Axis {
    fn eval(&self, t: f64) -> f64 {
        match self {
            Axis::Monotone(curve) => curve.eval(t),
            Axis::Periodic(curve) => curve.eval(t),
        }
    }
}

/// Shifts each angle by multiples of 360° so consecutive values differ by
/// less than 180°.
pub fn unwrap_degrees(hues: &mut [f64]) {
    for i in 1..hues.len() {
        let mut h = hues[i];
        while h - hues[i - 1] > 180.0 {
            h -= 360.0;
        }
        while h - hues[i - 1] < -180.0 {
            h += 360.0;
        }
        hues[i] = h;
    }
}
