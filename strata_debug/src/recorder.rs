// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. Each record starts with a tag byte and
//! the host time at which the sink received the event, so phase durations can
//! be reconstructed even though the engine's events carry no timestamps.
//! [`decode`] reads them back as an iterator of [`Record`].
//!
//! Per-node change events ([`on_node_changes`](TraceSink::on_node_changes))
//! store only the count.

use strata_core::time::{self, Duration, HostTime};
use strata_core::touch::TouchPhase;
use strata_core::trace::{
    FrameBeginEvent, FrameSummary, LifecycleEvent, LifecycleKind, NodeChange, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, PointerEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_POINTER: u8 = 4;
const TAG_LIFECYCLE: u8 = 5;
const TAG_FRAME_SUMMARY: u8 = 6;
const TAG_NODE_CHANGES_COUNT: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug)]
pub struct RecorderSink {
    buf: Vec<u8>,
    clock: fn() -> HostTime,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder stamping events with [`time::now`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(time::now)
    }

    /// Creates an empty recorder stamping events with `clock`.
    #[must_use]
    pub fn with_clock(clock: fn() -> HostTime) -> Self {
        Self {
            buf: Vec::new(),
            clock,
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn begin_record(&mut self, tag: u8) {
        let at = (self.clock)();
        self.write_u8(tag);
        self.write_u64(at.nanos());
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Update => 0,
            PhaseKind::Draw => 1,
            PhaseKind::Touch => 2,
            PhaseKind::Callbacks => 3,
        });
    }

    fn write_touch_phase(&mut self, p: TouchPhase) {
        self.write_u8(match p {
            TouchPhase::Down => 0,
            TouchPhase::Move => 1,
            TouchPhase::Up => 2,
            TouchPhase::DownUp => 3,
        });
    }

    fn write_lifecycle(&mut self, k: LifecycleKind) {
        self.write_u8(match k {
            LifecycleKind::Load => 0,
            LifecycleKind::Resume => 1,
            LifecycleKind::Pause => 2,
            LifecycleKind::LowMemory => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.begin_record(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.nanos());
        self.write_u64(e.delta.nanos());
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.begin_record(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.begin_record(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u32(e.items);
    }

    fn on_pointer(&mut self, e: &PointerEvent) {
        self.begin_record(TAG_POINTER);
        self.write_u64(e.frame_index);
        self.write_u32(e.pointer_id);
        self.write_touch_phase(e.phase);
        self.write_f64(e.x);
        self.write_f64(e.y);
        self.write_u32(e.began);
        self.write_u32(e.notified);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.begin_record(TAG_LIFECYCLE);
        self.write_lifecycle(e.kind);
        self.write_u64(e.now.nanos());
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.begin_record(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.nanos());
        self.write_u64(s.delta.nanos());
        self.write_u32(s.nodes_visited);
        self.write_u32(s.matrices_recomputed);
        self.write_u32(s.colors_recomputed);
        self.write_u32(s.orders_resorted);
        self.write_u32(s.draw_calls);
        self.write_u32(s.uploads);
        self.write_u32(s.touch_targets);
        self.write_u32(s.touches);
        self.write_u32(s.callbacks);
    }

    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        self.begin_record(TAG_NODE_CHANGES_COUNT);
        self.write_u64(frame_index);
        self.write_u32(u32::try_from(changes.len()).unwrap_or(u32::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`PointerEvent`].
    Pointer(PointerEvent),
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// Node-change count for a frame.
    NodeChangesCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of node changes.
        count: u32,
    },
}

/// A decoded event with the host time it was recorded at.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// When the sink received the event.
    pub at: HostTime,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Record`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded records.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Update,
            1 => PhaseKind::Draw,
            2 => PhaseKind::Touch,
            _ => PhaseKind::Callbacks,
        })
    }

    fn read_touch_phase(&mut self) -> Option<TouchPhase> {
        Some(match self.read_u8()? {
            0 => TouchPhase::Down,
            1 => TouchPhase::Move,
            2 => TouchPhase::Up,
            _ => TouchPhase::DownUp,
        })
    }

    fn read_lifecycle(&mut self) -> Option<LifecycleKind> {
        Some(match self.read_u8()? {
            0 => LifecycleKind::Load,
            1 => LifecycleKind::Resume,
            2 => LifecycleKind::Pause,
            _ => LifecycleKind::LowMemory,
        })
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            delta: Duration(self.read_u64()?),
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            items: self.read_u32()?,
        }))
    }

    fn decode_pointer(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Pointer(PointerEvent {
            frame_index: self.read_u64()?,
            pointer_id: self.read_u32()?,
            phase: self.read_touch_phase()?,
            x: self.read_f64()?,
            y: self.read_f64()?,
            began: self.read_u32()?,
            notified: self.read_u32()?,
        }))
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            kind: self.read_lifecycle()?,
            now: HostTime(self.read_u64()?),
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            delta: Duration(self.read_u64()?),
            nodes_visited: self.read_u32()?,
            matrices_recomputed: self.read_u32()?,
            colors_recomputed: self.read_u32()?,
            orders_resorted: self.read_u32()?,
            draw_calls: self.read_u32()?,
            uploads: self.read_u32()?,
            touch_targets: self.read_u32()?,
            touches: self.read_u32()?,
            callbacks: self.read_u32()?,
        }))
    }

    fn decode_node_changes_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::NodeChangesCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at = HostTime(self.read_u64()?);
        let event = match tag {
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_POINTER => self.decode_pointer(),
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_NODE_CHANGES_COUNT => self.decode_node_changes_count(),
            _ => None, // unknown tag → stop iteration
        }?;
        Some(Record { at, event })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
