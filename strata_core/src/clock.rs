// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pausable frame clock.
//!
//! [`FrameClock`] measures running time only: intervals between
//! [`stop`](FrameClock::stop) and the next [`start`](FrameClock::start) are
//! excluded, so frame deltas never include time spent paused.

use crate::time::{Duration, HostTime};

/// Accumulates host time while running.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    window_start: HostTime,
    accumulated: Duration,
    running: bool,
}

impl FrameClock {
    /// Creates a stopped clock with zero elapsed time.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            window_start: HostTime(0),
            accumulated: Duration::ZERO,
            running: false,
        }
    }

    /// Starts (or resumes) the clock at `now`. No-op if already running.
    pub fn start(&mut self, now: HostTime) {
        if self.running {
            return;
        }
        self.window_start = now;
        self.running = true;
    }

    /// Stops the clock at `now`, folding the running window into the total.
    /// No-op if already stopped.
    pub fn stop(&mut self, now: HostTime) {
        if !self.running {
            return;
        }
        self.accumulated = self
            .accumulated
            .saturating_add(now.saturating_duration_since(self.window_start));
        self.running = false;
    }

    /// Returns the total running time as of `now`.
    ///
    /// A `now` earlier than the current window start contributes nothing, so
    /// the result never decreases across calls with non-decreasing `now`.
    #[must_use]
    pub fn elapsed(&self, now: HostTime) -> Duration {
        if self.running {
            self.accumulated
                .saturating_add(now.saturating_duration_since(self.window_start))
        } else {
            self.accumulated
        }
    }

    /// Returns whether the clock is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }
}
