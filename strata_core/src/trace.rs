// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! [`TraceSink`] has one method per event the engine emits. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects per-phase counters during a frame and
//! produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`NodeChange`] events and the
//!   corresponding `TraceSink` method.

use crate::node::{DrawStats, UpdateStats};
use crate::time::{Duration, HostTime};
use crate::touch::{DispatchedTouch, TouchPhase};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the frame loop is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Flag propagation and world recomputation.
    Update,
    /// Batch submission.
    Draw,
    /// Pointer routing.
    Touch,
    /// Per-frame callbacks.
    Callbacks,
}

impl PhaseKind {
    /// Every phase, in frame order.
    pub const ALL: [Self; 4] = [Self::Update, Self::Draw, Self::Touch, Self::Callbacks];

    /// A short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Draw => "draw",
            Self::Touch => "touch",
            Self::Callbacks => "callbacks",
        }
    }
}

/// Application lifecycle transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// First start.
    Load,
    /// Every start.
    Resume,
    /// Every stop.
    Pause,
    /// Host memory warning.
    LowMemory,
}

/// Which derived value of a node changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeField {
    /// World matrix.
    Transform,
    /// World color.
    Color,
    /// Child draw order.
    Order,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a running engine begins a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time passed to the step.
    pub now: HostTime,
    /// Running time since the previous frame.
    pub delta: Duration,
}

/// Marks the beginning of a frame-loop phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
}

/// Marks the end of a frame-loop phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Work items handled: nodes visited, draw calls, touches, or callbacks.
    pub items: u32,
}

/// Emitted for every routed touch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Pointer id.
    pub pointer_id: u32,
    /// Routed phase.
    pub phase: TouchPhase,
    /// Scene-space x.
    pub x: f64,
    /// Scene-space y.
    pub y: f64,
    /// Nodes offered the press.
    pub began: u32,
    /// Nodes that received a listener call.
    pub notified: u32,
}

impl PointerEvent {
    /// Creates a pointer event from a routed touch.
    #[must_use]
    pub fn new(frame_index: u64, d: &DispatchedTouch) -> Self {
        Self {
            frame_index,
            pointer_id: d.touch.id,
            phase: d.touch.phase,
            x: d.touch.position.x,
            y: d.touch.position.y,
            began: d.began,
            notified: d.notified,
        }
    }
}

/// Emitted on application lifecycle transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Which transition.
    pub kind: LifecycleKind,
    /// Host time passed to the transition.
    pub now: HostTime,
}

/// Per-frame counters produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time passed to the step.
    pub now: HostTime,
    /// Running time since the previous frame.
    pub delta: Duration,
    /// Nodes visited by the update pass.
    pub nodes_visited: u32,
    /// World matrices recomputed.
    pub matrices_recomputed: u32,
    /// World colors recomputed.
    pub colors_recomputed: u32,
    /// Containers re-sorted.
    pub orders_resorted: u32,
    /// Batches submitted.
    pub draw_calls: u32,
    /// Submissions that carried uploads.
    pub uploads: u32,
    /// Touch targets collected.
    pub touch_targets: u32,
    /// Touch events routed.
    pub touches: u32,
    /// Callbacks invoked.
    pub callbacks: u32,
}

/// A per-frame node change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeChange {
    /// Slot index of the node that changed.
    pub node_index: u32,
    /// Which value changed.
    pub field: NodeField,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame begins.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a frame-loop phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame-loop phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called for every routed touch.
    fn on_pointer(&mut self, e: &PointerEvent) {
        _ = e;
    }

    /// Called on lifecycle transitions.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called with a per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with per-frame node changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        _ = (frame_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! emit {
    ($self:ident, $method:ident, $e:expr) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        emit!(self, on_frame_begin, e);
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        emit!(self, on_phase_begin, e);
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        emit!(self, on_phase_end, e);
    }

    /// Emits a [`PointerEvent`].
    #[inline]
    pub fn pointer(&mut self, e: &PointerEvent) {
        emit!(self, on_pointer, e);
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        emit!(self, on_lifecycle, e);
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        emit!(self, on_frame_summary, s);
    }

    /// Emits node changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        if let Some(s) = &mut self.sink {
            s.on_node_changes(frame_index, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects per-phase counters during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    summary: FrameSummary,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the frame described by `begin`.
    #[must_use]
    pub fn new(begin: &FrameBeginEvent) -> Self {
        Self {
            summary: FrameSummary {
                frame_index: begin.frame_index,
                now: begin.now,
                delta: begin.delta,
                ..FrameSummary::default()
            },
        }
    }

    /// Records the update pass counters.
    pub fn record_update(&mut self, stats: &UpdateStats) {
        self.summary.nodes_visited = stats.nodes_visited;
        self.summary.matrices_recomputed = stats.matrices_recomputed;
        self.summary.colors_recomputed = stats.colors_recomputed;
        self.summary.orders_resorted = stats.orders_resorted;
        self.summary.touch_targets = stats.touch_targets;
    }

    /// Records the draw pass counters.
    pub fn record_draw(&mut self, stats: &DrawStats) {
        self.summary.draw_calls = stats.draw_calls;
        self.summary.uploads = stats.uploads;
    }

    /// Records the number of routed touches.
    pub fn record_touches(&mut self, n: u32) {
        self.summary.touches = n;
    }

    /// Records the number of invoked callbacks.
    pub fn record_callbacks(&mut self, n: u32) {
        self.summary.callbacks = n;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
