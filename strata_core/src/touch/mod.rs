// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input and touch routing.
//!
//! Hosts deliver raw [`PointerSample`]s, at most one per pointer id per frame,
//! keyed by id in a [`PointerSamples`] map. The [`TouchRouter`] turns them into
//! [`Touch`] events with history (start position, deltas, timing) and routes
//! them to the touch-enabled nodes collected by the update pass:
//!
//! - nodes are visited in reverse draw order, so the topmost node sees a
//!   press first;
//! - a press ([`TouchPhase::Down`] or [`TouchPhase::DownUp`]) is offered
//!   through [`TouchListener::touch_begin`] only to nodes whose hit shape
//!   contains the point, and a swallowing node that accepts it hides the press
//!   from the nodes beneath;
//! - moves and releases reach every collected node, so a listener can track a
//!   drag that leaves its bounds.
//!
//! [`GestureListener`] layers tap, enter, over, and exit semantics on top of
//! the raw listener calls. With the `std` feature, [`PointerBuffer`] collects
//! samples from an input thread and hands the host one coalesced map per
//! frame.

use alloc::collections::BTreeMap;

use kurbo::{Point, Vec2};

#[cfg(feature = "std")]
mod buffer;
mod gesture;
mod listener;
mod router;

#[cfg(feature = "std")]
pub use buffer::PointerBuffer;
pub use gesture::GestureListener;
pub use listener::{HitShape, TouchContext, TouchListener, Touchable};
pub use router::{DispatchedTouch, TouchRouter, TouchRouterConfig};

/// Phase of a raw pointer sample as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// The pointer went down.
    Down,
    /// The pointer moved while down.
    Move,
    /// The pointer was released.
    Up,
}

/// One raw pointer sample in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// What happened.
    pub phase: PointerPhase,
    /// Horizontal position in view pixels.
    pub x: f64,
    /// Vertical position in view pixels.
    pub y: f64,
}

impl PointerSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self { phase, x, y }
    }
}

/// The pointer samples for one frame, keyed by pointer id.
pub type PointerSamples = BTreeMap<u32, PointerSample>;

/// Phase of a routed touch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Press.
    Down,
    /// Drag.
    Move,
    /// Release.
    Up,
    /// Press and release observed in the same frame.
    DownUp,
}

impl TouchPhase {
    /// Returns whether this phase begins a touch.
    #[must_use]
    pub const fn is_press(self) -> bool {
        matches!(self, Self::Down | Self::DownUp)
    }

    /// Returns whether this phase ends a touch.
    #[must_use]
    pub const fn is_release(self) -> bool {
        matches!(self, Self::Up | Self::DownUp)
    }
}

/// A routed touch event with its pointer history.
///
/// Positions are in scene units; `view_*` fields keep the raw view
/// coordinates. Times are seconds of engine running time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Touch {
    /// Pointer id.
    pub id: u32,
    /// Phase of this event.
    pub phase: TouchPhase,
    /// Current position in scene units.
    pub position: Point,
    /// Current position in view pixels.
    pub view_position: Point,
    /// Position when the pointer went down, in scene units.
    pub start_position: Point,
    /// Position when the pointer went down, in view pixels.
    pub start_view_position: Point,
    /// Movement since the previous event for this pointer, in scene units.
    pub delta_position: Vec2,
    /// Movement since the previous event for this pointer, in view pixels.
    pub delta_view_position: Vec2,
    /// When the pointer went down.
    pub start_time: f64,
    /// Time since the previous event for this pointer.
    pub delta_time: f64,
    /// When this event was produced.
    pub uptime: f64,
}

impl Touch {
    /// A fresh press with no history.
    pub(crate) fn pressed(id: u32, position: Point, view_position: Point, uptime: f64) -> Self {
        Self {
            id,
            phase: TouchPhase::Down,
            position,
            view_position,
            start_position: position,
            start_view_position: view_position,
            delta_position: Vec2::ZERO,
            delta_view_position: Vec2::ZERO,
            start_time: uptime,
            delta_time: 0.0,
            uptime,
        }
    }

    /// The next event for the same pointer, with deltas against `self`.
    pub(crate) fn advanced(
        &self,
        phase: TouchPhase,
        position: Point,
        view_position: Point,
        uptime: f64,
    ) -> Self {
        Self {
            phase,
            position,
            view_position,
            delta_position: position - self.position,
            delta_view_position: view_position - self.view_position,
            delta_time: uptime - self.uptime,
            uptime,
            ..*self
        }
    }

    /// Total movement since the press, in scene units.
    #[must_use]
    pub fn travel(&self) -> Vec2 {
        self.position - self.start_position
    }
}
