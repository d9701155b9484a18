// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! The differentiable objective a gradient run minimizes.

use std::time::Instant;

use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use cg_ucs::{srgb_to_jab_with_jacobian, BakedConditions, ViewingConditions};

use crate::target::TargetCurve;

/// Weight of the smoothness term. The step-to-step differences it penalizes
/// are two orders of magnitude smaller than the absolute appearance
/// coordinates, so the term has to be up-weighted this aggressively to
/// influence the solution at all.
pub const DEFAULT_DIFF_WEIGHT: f64 = 1e4;

/// Background colors that pair well with the appearance model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    Dark,
    Neutral,
    Light,
}

impl Background {
    pub fn rgb(self) -> [f64; 3] {
        match self {
            Background::Dark => [0.2; 3],
            Background::Neutral => [0.5; 3],
            Background::Light => [0.8; 3],
        }
    }
}

/// Loss and gradient evaluator with its viewing-condition constants baked
/// in at construction time.
///
/// Construction is the expensive step (the analog of compiling an autodiff
/// graph); evaluation is cheap and stateless, so one instance is safely
/// shared read-only by any number of concurrent requests. The background
/// color is fixed when the evaluator is built.
#[derive(Clone, Debug)]
pub struct CompiledLoss {
    bc: BakedConditions,
    diff_weight: f64,
}

impl CompiledLoss {
    pub fn new(background: [f64; 3], diff_weight: f64) -> Self {
        let started = Instant::now();
        let bc = ViewingConditions::srgb_display(background).bake();
        tracing::debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            ?background,
            "baked loss evaluator"
        );
        Self { bc, diff_weight }
    }

    pub fn conditions(&self) -> &BakedConditions {
        &self.bc
    }

    pub fn diff_weight(&self) -> f64 {
        self.diff_weight
    }

    /// Loss and gradient of one candidate gradient against the target.
    ///
    /// loss = Σ‖jab(c) − ideal‖² + w · mean((Δjab(c) − Δideal)²)
    ///
    /// The per-sample appearance Jacobians are independent, so they are
    /// computed in parallel; the chain-rule assembly afterwards is linear
    /// and cheap. Reentrant: no state survives between calls.
    pub fn evaluate(
        &self,
        candidate: &[[f64; 3]],
        target: &TargetCurve,
    ) -> (f64, Vec<[f64; 3]>) {
        let n = candidate.len();
        debug_assert_eq!(n, target.len());
        debug_assert!(n >= 2);

        let per_sample: Vec<([f64; 3], [[f64; 3]; 3])> = candidate
            .par_iter()
            .map(|&rgb| srgb_to_jab_with_jacobian(rgb, &self.bc))
            .collect();

        let ideal = target.ideal_jab();
        let ideal_diff = target.ideal_diff();
        let diff_count = ((n - 1) * 3) as f64;

        let mut ucs_loss = 0.0;
        for (sample, ideal) in per_sample.iter().zip(ideal) {
            for k in 0..3 {
                let e = sample.0[k] - ideal[k];
                ucs_loss += e * e;
            }
        }

        let mut diff_loss = 0.0;
        let mut residual = vec![[0.0; 3]; n - 1];
        for i in 0..n - 1 {
            for k in 0..3 {
                let d = per_sample[i + 1].0[k] - per_sample[i].0[k] - ideal_diff[i][k];
                residual[i][k] = d;
                diff_loss += d * d;
            }
        }
        diff_loss /= diff_count;

        // ∂loss/∂jab, then through each sample's Jacobian.
        let diff_scale = 2.0 * self.diff_weight / diff_count;
        let grad = per_sample
            .iter()
            .enumerate()
            .map(|(i, (jab, jacobian))| {
                let mut djab = [0.0; 3];
                for k in 0..3 {
                    djab[k] = 2.0 * (jab[k] - ideal[i][k]);
                    if i > 0 {
                        djab[k] += diff_scale * residual[i - 1][k];
                    }
                    if i < n - 1 {
                        djab[k] -= diff_scale * residual[i][k];
                    }
                }
                let mut g = [0.0; 3];
                for (row, d) in jacobian.iter().zip(djab) {
                    for (slot, j) in g.iter_mut().zip(row) {
                        *slot += d * j;
                    }
                }
                g
            })
            .collect();

        (ucs_loss + self.diff_weight * diff_loss, grad)
    }

    /// [`evaluate`](Self::evaluate) over a flat parameter vector, as the
    /// optimizer sees it.
    pub fn evaluate_flat(&self, flat: &[f64], target: &TargetCurve) -> (f64, Vec<f64>) {
        let candidate: Vec<[f64; 3]> = flat
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        let (loss, grad) = self.evaluate(&candidate, target);
        (loss, grad.into_iter().flatten().collect())
    }
}

static SHARED: OnceCell<CompiledLoss> = OnceCell::new();

/// The process-wide evaluator, built once on first use behind a
/// synchronized guard and shared read-only afterwards. Uses the neutral
/// background; requests that need a different background construct their
/// own [`CompiledLoss`].
pub fn shared_loss() -> &'static CompiledLoss {
    SHARED.get_or_init(|| CompiledLoss::new(Background::Neutral.rgb(), DEFAULT_DIFF_WEIGHT))
}
