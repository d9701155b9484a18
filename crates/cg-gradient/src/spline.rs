// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! One-dimensional interpolants for the target curve.
//!
//! Non-periodic curves use a PCHIP (Fritsch–Carlson) monotone cubic: unlike
//! a natural cubic spline it cannot overshoot, which matters because
//! overshoot in lightness or chroma between widely spaced stops would push
//! the target outside anything the gamut can represent. Periodic curves use
//! a classic cyclic cubic spline so the closed curve has matching value and
//! derivatives at the seam.

/// Shape-preserving monotone cubic interpolant over strictly increasing
/// abscissae.
#[derive(Clone, Debug)]
pub struct Pchip {
    x: Vec<f64>,
    y: Vec<f64>,
    d: Vec<f64>,
}

impl Pchip {
    /// Fits the interpolant. `x` must be strictly increasing and at least
    /// two points long; with exactly two points this degrades to linear
    /// interpolation.
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert!(x.len() >= 2);
        debug_assert!(x.windows(2).all(|w| w[1] > w[0]));

        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let delta: Vec<f64> = h
            .iter()
            .zip(y.windows(2))
            .map(|(h, w)| (w[1] - w[0]) / h)
            .collect();

        let mut d = vec![0.0; n];
        if n == 2 {
            d[0] = delta[0];
            d[1] = delta[0];
        } else {
            d[0] = edge_slope(h[0], h[1], delta[0], delta[1]);
            d[n - 1] = edge_slope(
                h[n - 2],
                h[n - 3],
                delta[n - 2],
                delta[n - 3],
            );
            for i in 1..n - 1 {
                if delta[i - 1] * delta[i] <= 0.0 {
                    d[i] = 0.0;
                } else {
                    let w1 = 2.0 * h[i] + h[i - 1];
                    let w2 = h[i] + 2.0 * h[i - 1];
                    d[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
                }
            }
        }

        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            d,
        }
    }

    /// Evaluates the interpolant; `t` outside the knot range is clamped.
    pub fn eval(&self, t: f64) -> f64 {
        let (i, s, h) = locate(&self.x, t);
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * self.y[i] + h10 * h * self.d[i] + h01 * self.y[i + 1] + h11 * h * self.d[i + 1]
    }
}

/// One-sided endpoint slope with monotonicity limiting, after the scheme
/// scipy's PCHIP uses.
fn edge_slope(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);
    if sgn(d) != sgn(delta0) {
        0.0
    } else if sgn(delta0) != sgn(delta1) && d.abs() > 3.0 * delta0.abs() {
        3.0 * delta0
    } else {
        d
    }
}

/// Sign with `sgn(0) == 0`, unlike `f64::signum`.
fn sgn(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Cyclic cubic spline through knots whose last ordinate equals the first.
#[derive(Clone, Debug)]
pub struct PeriodicCubic {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots; the last entry repeats the first.
    m: Vec<f64>,
}

impl PeriodicCubic {
    /// Fits the closed spline. The caller must have forced `y[n-1] == y[0]`;
    /// with two knots the curve degenerates to a constant segment.
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert!(x.len() >= 2);
        debug_assert!(x.windows(2).all(|w| w[1] > w[0]));

        let n = x.len();
        let segments = n - 1;
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let delta: Vec<f64> = h
            .iter()
            .zip(y.windows(2))
            .map(|(h, w)| (w[1] - w[0]) / h)
            .collect();

        let mut m = vec![0.0; n];
        if segments >= 2 {
            let prev = |i: usize| (i + segments - 1) % segments;
            let sub: Vec<f64> = (0..segments).map(|i| h[prev(i)]).collect();
            let diag: Vec<f64> = (0..segments)
                .map(|i| 2.0 * (h[prev(i)] + h[i]))
                .collect();
            let sup: Vec<f64> = (0..segments).map(|i| h[i]).collect();
            let rhs: Vec<f64> = (0..segments)
                .map(|i| 6.0 * (delta[i] - delta[prev(i)]))
                .collect();

            let solution = if segments == 2 {
                // The two off-diagonal neighbours coincide; solve densely.
                let a00 = diag[0];
                let a01 = sub[0] + sup[0];
                let a10 = sub[1] + sup[1];
                let a11 = diag[1];
                let det = a00 * a11 - a01 * a10;
                vec![
                    (rhs[0] * a11 - a01 * rhs[1]) / det,
                    (a00 * rhs[1] - rhs[0] * a10) / det,
                ]
            } else {
                solve_cyclic_tridiagonal(&sub, &diag, &sup, sub[0], sup[segments - 1], &rhs)
            };
            m[..segments].copy_from_slice(&solution);
            m[segments] = solution[0];
        }

        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        }
    }

    /// Evaluates the spline; `t` outside the knot range is clamped.
    pub fn eval(&self, t: f64) -> f64 {
        let (i, s, h) = locate(&self.x, t);
        let t_right = (1.0 - s) * h;
        let t_left = s * h;
        self.m[i] * t_right * t_right * t_right / (6.0 * h)
            + self.m[i + 1] * t_left * t_left * t_left / (6.0 * h)
            + (self.y[i] - self.m[i] * h * h / 6.0) * (1.0 - s)
            + (self.y[i + 1] - self.m[i + 1] * h * h / 6.0) * s
    }
}

/// Segment index, normalized offset, and width for an evaluation point.
fn locate(x: &[f64], t: f64) -> (usize, f64, f64) {
    let t = t.clamp(x[0], x[x.len() - 1]);
    let i = x
        .partition_point(|&knot| knot <= t)
        .saturating_sub(1)
        .min(x.len() - 2);
    let h = x[i + 1] - x[i];
    (i, (t - x[i]) / h, h)
}

/// Thomas algorithm for a strictly tridiagonal system.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];
    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = if i < n - 1 { sup[i] / denom } else { 0.0 };
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }
    for i in (0..n - 1).rev() {
        d[i] -= c[i] * d[i + 1];
    }
    d
}

/// Sherman–Morrison solve for a tridiagonal system with the two cyclic
/// corner entries `corner_top` (row 0, last column) and `corner_bottom`
/// (last row, column 0).
fn solve_cyclic_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    corner_top: f64,
    corner_bottom: f64,
    rhs: &[f64],
) -> Vec<f64> {
    let n = diag.len();
    let gamma = -diag[0];
    let mut modified = diag.to_vec();
    modified[0] -= gamma;
    modified[n - 1] -= corner_top * corner_bottom / gamma;

    let x = solve_tridiagonal(sub, &modified, sup, rhs);

    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = corner_bottom;
    let z = solve_tridiagonal(sub, &modified, sup, &u);

    let factor = (x[0] + corner_top * x[n - 1] / gamma)
        / (1.0 + z[0] + corner_top * z[n - 1] / gamma);
    x.iter().zip(&z).map(|(x, z)| x - factor * z).collect()
}
