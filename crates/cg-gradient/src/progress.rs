// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Mid-run progress reporting.
//!
//! The compute loop emits a [`Progress`] roughly every hundred iterations.
//! Reporting must never block the optimization thread, and because a single
//! thread emits for one request, per-request ordering is preserved by
//! construction no matter what the sink does on the other side.

use std::fmt;

use serde::Serialize;

/// A snapshot of one running optimization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Progress {
    pub iteration: usize,
    pub loss: f64,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iteration {}, loss = {:.3}", self.iteration, self.loss)
    }
}

/// Receives progress snapshots from a running optimization.
///
/// Implementations must not block; a snapshot that cannot be delivered may
/// simply be dropped — progress is advisory and never required for
/// correctness.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn report(&self, progress: Progress) {
        self(progress)
    }
}

/// Channel-backed sink: snapshots cross to the consumer's thread without
/// ever blocking the producer. With a bounded channel, snapshots that do
/// not fit are dropped.
#[derive(Clone, Debug)]
pub struct ChannelSink(pub crossbeam_channel::Sender<Progress>);

impl ProgressSink for ChannelSink {
    fn report(&self, progress: Progress) {
        let _ = self.0.try_send(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_the_status_line_format() {
        let progress = Progress {
            iteration: 300,
            loss: 12.3456,
        };
        assert_eq!(progress.to_string(), "Iteration 300, loss = 12.346");
    }

    #[test]
    fn channel_sink_preserves_order_and_never_blocks() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let sink = ChannelSink(tx);
        for i in 0..5 {
            sink.report(Progress {
                iteration: i * 100,
                loss: 1.0 / (i + 1) as f64,
            });
        }
        let got: Vec<usize> = rx.try_iter().map(|p| p.iteration).collect();
        assert_eq!(got, vec![0, 100, 200, 300, 400]);
    }

    #[test]
    fn disconnected_receiver_is_not_an_error() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        ChannelSink(tx).report(Progress {
            iteration: 100,
            loss: 0.5,
        });
    }
}
