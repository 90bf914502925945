// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sampled frame statistics for on-screen overlays.
//!
//! Readouts refresh at a fixed interval rather than every frame, so a
//! displayed FPS value stays readable.

/// Default refresh interval of the readouts, in seconds.
pub const DEFAULT_STATS_INTERVAL: f32 = 0.2;

/// Highest FPS value reported.
const MAX_FPS: f32 = 999.99;

/// A sampled snapshot of the frame loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Instantaneous frames per second at sampling time.
    pub fps: f32,
    /// Frame delta at sampling time, in seconds.
    pub delta: f32,
    /// Draw calls issued by the sampled frame.
    pub draw_calls: u32,
    /// Live nodes in the active scene.
    pub nodes: usize,
}

/// Frame counters with an interval-sampled snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    interval: f32,
    accumulated: f32,
    frames: u64,
    snapshot: StatsSnapshot,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_INTERVAL)
    }
}

impl FrameStats {
    /// Creates stats that resample every `interval` seconds.
    #[must_use]
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulated: 0.0,
            frames: 0,
            snapshot: StatsSnapshot::default(),
        }
    }

    /// Records one frame. Returns whether the snapshot was refreshed.
    pub fn record(&mut self, delta: f32, draw_calls: u32, nodes: usize) -> bool {
        self.frames += 1;
        self.accumulated += delta;
        if self.accumulated < self.interval {
            return false;
        }
        self.accumulated = 0.0;
        let fps = if delta > 0.0 { 1.0 / delta } else { MAX_FPS };
        self.snapshot = StatsSnapshot {
            fps: fps.min(MAX_FPS),
            delta,
            draw_calls,
            nodes,
        };
        true
    }

    /// Latest sampled values.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        self.snapshot
    }

    /// Frames recorded so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
