// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use cg_gradient::{
    make_gradient, shared_loss, AdamConfig, ChannelSink, ColorStop, GradientError,
    GradientOptions, Progress,
};

fn three_stop_ramp() -> Vec<ColorStop> {
    vec![
        ColorStop::from_rgb8(0.0, [51, 51, 127]),
        ColorStop::from_rgb8(1.0 / 3.0, [51, 127, 51]),
        ColorStop::from_rgb8(1.0, [255, 102, 51]),
    ]
}

fn seeded(steps: usize) -> GradientOptions {
    GradientOptions {
        steps,
        seed: Some(7),
        ..GradientOptions::default()
    }
}

#[test]
fn thirty_step_ramp_is_smooth_and_in_gamut() {
    let options = seeded(30);
    let result = make_gradient(&three_stop_ramp(), &options, None).unwrap();

    assert_eq!(result.positions.len(), 30);
    assert_eq!(result.colors.len(), 30);
    assert!(result.iterations <= options.adam.max_iter);
    for color in &result.colors {
        for &channel in color {
            assert!((0.0..=1.0).contains(&channel), "out of gamut: {channel}");
        }
    }
    for pair in result.colors.windows(2) {
        for k in 0..3 {
            assert!(
                (pair[1][k] - pair[0][k]).abs() < 0.2,
                "adjacent colors jump: {pair:?}"
            );
        }
    }
    assert!(
        result.loss < 1.0,
        "expected a converged ramp, final loss {}",
        result.loss
    );
    assert!(result.summary.contains("iterations"));
}

#[test]
fn sampling_at_the_stops_recovers_their_colors() {
    let stops = vec![
        ColorStop::from_rgb8(0.0, [51, 51, 127]),
        ColorStop::from_rgb8(0.5, [51, 127, 51]),
        ColorStop::from_rgb8(1.0, [255, 102, 51]),
    ];
    let result = make_gradient(&stops, &seeded(3), None).unwrap();
    for (color, stop) in result.colors.iter().zip(&stops) {
        for k in 0..3 {
            assert!(
                (color[k] - stop.rgb[k]).abs() < 0.1,
                "sample {color:?} drifted from stop {:?}",
                stop.rgb
            );
        }
    }
}

#[test]
fn two_steps_return_the_endpoint_colors() {
    let stops = vec![
        ColorStop::from_rgb8(0.0, [40, 40, 40]),
        ColorStop::from_rgb8(1.0, [220, 220, 220]),
    ];
    let result = make_gradient(&stops, &seeded(2), None).unwrap();
    assert_eq!(result.colors.len(), 2);
    for (color, stop) in result.colors.iter().zip(&stops) {
        for k in 0..3 {
            assert!((color[k] - stop.rgb[k]).abs() < 0.1);
        }
    }
}

#[test]
fn periodic_gradient_closes_on_itself() {
    let stops = vec![
        ColorStop::from_rgb8(0.0, [200, 60, 60]),
        ColorStop::from_rgb8(0.5, [60, 60, 200]),
        ColorStop::from_rgb8(1.0, [200, 60, 60]),
    ];
    let options = GradientOptions {
        periodic: true,
        ..seeded(12)
    };
    let result = make_gradient(&stops, &options, None).unwrap();
    let first = result.colors[0];
    let last = result.colors[11];
    for k in 0..3 {
        assert!(
            (first[k] - last[k]).abs() < 0.02,
            "periodic endpoints diverge: {first:?} vs {last:?}"
        );
    }
}

#[test]
fn periodic_two_stops_two_steps_yields_equal_colors() {
    let stops = vec![
        ColorStop::from_rgb8(0.0, [200, 60, 60]),
        ColorStop::from_rgb8(1.0, [60, 60, 200]),
    ];
    let options = GradientOptions {
        periodic: true,
        ..seeded(2)
    };
    let result = make_gradient(&stops, &options, None).unwrap();
    for k in 0..3 {
        assert!(
            (result.colors[0][k] - result.colors[1][k]).abs() < 0.01,
            "closed two-step gradient must repeat one color: {:?}",
            result.colors
        );
    }
}

#[test]
fn iteration_cap_is_honored_and_still_returns_a_result() {
    let options = GradientOptions {
        adam: AdamConfig {
            max_iter: 50,
            ..AdamConfig::default()
        },
        ..seeded(8)
    };
    let result = make_gradient(&three_stop_ramp(), &options, None).unwrap();
    assert_eq!(result.iterations, 50);
    assert_eq!(result.colors.len(), 8);
    assert!(result.loss.is_finite());
}

#[test]
fn input_validation_happens_before_any_optimization() {
    let one_stop = vec![ColorStop::from_rgb8(0.0, [10, 10, 10])];
    assert!(matches!(
        make_gradient(&one_stop, &GradientOptions::default(), None),
        Err(GradientError::TooFewStops { got: 1 })
    ));

    let stops = three_stop_ramp();
    for bad_steps in [0, 1, 1025] {
        let options = GradientOptions {
            steps: bad_steps,
            ..GradientOptions::default()
        };
        assert!(matches!(
            make_gradient(&stops, &options, None),
            Err(GradientError::StepsOutOfRange { .. })
        ));
    }

    let unsorted = vec![
        ColorStop::from_rgb8(0.6, [10, 10, 10]),
        ColorStop::from_rgb8(0.2, [200, 200, 200]),
    ];
    assert!(matches!(
        make_gradient(&unsorted, &GradientOptions::default(), None),
        Err(GradientError::NonMonotonePositions { index: 1 })
    ));
}

#[test]
fn progress_arrives_in_order_every_hundred_iterations() {
    let (tx, rx) = crossbeam_channel::unbounded::<Progress>();
    let sink = ChannelSink(tx);
    let options = GradientOptions {
        adam: AdamConfig {
            max_iter: 350,
            tolerance: 0.0,
            ..AdamConfig::default()
        },
        ..seeded(6)
    };
    make_gradient(&three_stop_ramp(), &options, Some(&sink)).unwrap();
    drop(sink);
    let iterations: Vec<usize> = rx.iter().map(|p| p.iteration).collect();
    assert_eq!(iterations, vec![100, 200, 300]);
}

#[test]
fn concurrent_requests_share_the_evaluator_without_interference() {
    let _ = shared_loss();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let options = GradientOptions {
                    adam: AdamConfig {
                        max_iter: 200,
                        ..AdamConfig::default()
                    },
                    seed: Some(i),
                    steps: 4,
                    ..GradientOptions::default()
                };
                make_gradient(&three_stop_ramp(), &options, None).unwrap()
            })
        })
        .collect();
    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result.colors.len(), 4);
        assert!(result.loss.is_finite());
    }
}

#[test]
fn results_serialize_for_the_presentation_layer() {
    let options = GradientOptions {
        adam: AdamConfig {
            max_iter: 20,
            ..AdamConfig::default()
        },
        ..seeded(4)
    };
    let result = make_gradient(&three_stop_ramp(), &options, None).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"positions\""));
    assert!(json.contains("\"summary\""));
}
