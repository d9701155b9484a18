// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cg_gradient::{
    make_gradient, shared_loss, AdamConfig, ColorStop, GradientOptions, TargetCurve,
};

fn stops() -> Vec<ColorStop> {
    vec![
        ColorStop::from_rgb8(0.0, [51, 51, 127]),
        ColorStop::from_rgb8(1.0 / 3.0, [51, 127, 51]),
        ColorStop::from_rgb8(1.0, [255, 102, 51]),
    ]
}

fn bench_loss_evaluation(c: &mut Criterion) {
    let loss = shared_loss();
    let target = TargetCurve::build(&stops(), 30, false, loss.conditions());
    let candidate = vec![[0.5_f64; 3]; 30];
    c.bench_function("loss_evaluate_30", |b| {
        b.iter(|| loss.evaluate(black_box(&candidate), black_box(&target)))
    });
}

fn bench_short_run(c: &mut Criterion) {
    let options = GradientOptions {
        steps: 30,
        seed: Some(7),
        adam: AdamConfig {
            max_iter: 200,
            ..AdamConfig::default()
        },
        ..GradientOptions::default()
    };
    c.bench_function("make_gradient_200_iters", |b| {
        b.iter(|| make_gradient(black_box(&stops()), &options, None).unwrap())
    });
}

criterion_group!(benches, bench_loss_evaluation, bench_short_run);
criterion_main!(benches);
