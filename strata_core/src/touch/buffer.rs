// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thread-safe pointer sample collection.
//!
//! Platform input usually arrives on a different thread than the frame
//! callback and at a higher rate. [`PointerBuffer`] coalesces everything
//! recorded between two frames into one sample per pointer:
//!
//! - a later sample replaces an earlier one, except that a pending `Down` or
//!   `Up` is never overwritten by a `Move`;
//! - an `Up` recorded over a pending `Down` is carried into the next frame,
//!   so the router still sees the press first and can fold both into a
//!   [`DownUp`](super::TouchPhase::DownUp);
//! - a `Down` recorded over a pending `Up` is carried likewise, so a release
//!   is never lost to a quick re-press.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{PointerPhase, PointerSample, PointerSamples};

#[derive(Debug, Default)]
struct Pending {
    current: PointerSamples,
    carried: PointerSamples,
}

/// Collects pointer samples from any thread; the frame thread drains them once
/// per frame with [`take`](Self::take).
#[derive(Debug, Default)]
pub struct PointerBuffer {
    inner: Mutex<Pending>,
}

impl PointerBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sample for pointer `id`.
    pub fn record(&self, id: u32, phase: PointerPhase, x: f64, y: f64) {
        let sample = PointerSample::new(phase, x, y);
        let mut guard = self.lock();
        let pending = &mut *guard;
        let previous = pending.current.get(&id).map(|s| s.phase);
        match (previous, phase) {
            (Some(PointerPhase::Down), PointerPhase::Up)
            | (Some(PointerPhase::Up), PointerPhase::Down) => {
                pending.carried.insert(id, sample);
            }
            (Some(PointerPhase::Down | PointerPhase::Up), PointerPhase::Move) => {}
            _ => {
                pending.current.insert(id, sample);
            }
        }
    }

    /// Returns this frame's samples and starts the next frame with any carried
    /// samples.
    pub fn take(&self) -> PointerSamples {
        let mut guard = self.lock();
        let pending = &mut *guard;
        let out = core::mem::take(&mut pending.current);
        pending.current = core::mem::take(&mut pending.carried);
        out
    }

    /// Returns whether nothing is waiting for the next [`take`](Self::take).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let guard = self.lock();
        guard.current.is_empty() && guard.carried.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        // Samples stay consistent even if a recording thread panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn phases(samples: &PointerSamples) -> std::vec::Vec<(u32, PointerPhase)> {
        samples.iter().map(|(&id, s)| (id, s.phase)).collect()
    }

    #[test]
    fn later_move_replaces_move() {
        let buf = PointerBuffer::new();
        buf.record(1, PointerPhase::Move, 1.0, 1.0);
        buf.record(1, PointerPhase::Move, 5.0, 6.0);
        let s = buf.take();
        assert_eq!(s[&1], PointerSample::new(PointerPhase::Move, 5.0, 6.0));
        assert!(buf.is_empty());
    }

    #[test]
    fn move_does_not_hide_a_press() {
        let buf = PointerBuffer::new();
        buf.record(1, PointerPhase::Down, 1.0, 1.0);
        buf.record(1, PointerPhase::Move, 9.0, 9.0);
        assert_eq!(buf.take()[&1], PointerSample::new(PointerPhase::Down, 1.0, 1.0));
    }

    #[test]
    fn tap_within_one_frame_spans_two_takes() {
        let buf = PointerBuffer::new();
        buf.record(3, PointerPhase::Down, 1.0, 1.0);
        buf.record(3, PointerPhase::Up, 2.0, 1.0);
        assert_eq!(phases(&buf.take()), [(3, PointerPhase::Down)]);
        assert!(!buf.is_empty());
        assert_eq!(phases(&buf.take()), [(3, PointerPhase::Up)]);
        assert!(buf.take().is_empty());
    }

    #[test]
    fn re_press_after_release_is_carried() {
        let buf = PointerBuffer::new();
        buf.record(1, PointerPhase::Up, 1.0, 1.0);
        buf.record(1, PointerPhase::Down, 4.0, 4.0);
        assert_eq!(phases(&buf.take()), [(1, PointerPhase::Up)]);
        assert_eq!(phases(&buf.take()), [(1, PointerPhase::Down)]);
    }

    #[test]
    fn records_from_other_threads() {
        let buf = Arc::new(PointerBuffer::new());
        let handles: std::vec::Vec<_> = (0..4_u32)
            .map(|id| {
                let buf = Arc::clone(&buf);
                thread::spawn(move || buf.record(id, PointerPhase::Down, 0.0, 0.0))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(buf.take().len(), 4);
    }
}
