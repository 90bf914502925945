// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene graph and frame pipeline for real-time 2D rendering.
//!
//! `strata_core` owns everything between the host's frame callback and the
//! GPU submission boundary. It is `no_std` compatible (with `alloc`) and
//! stores nodes in struct-of-arrays form behind generational handles.
//!
//! # Architecture
//!
//! One call to [`Engine::step`](engine::Engine::step) runs a fixed sequence
//! of phases against the active [`Scene`](scene::Scene):
//!
//! ```text
//!   host frame callback (now, pointer samples)
//!       │
//!       ▼
//!   FrameClock::elapsed() ──► delta
//!       │
//!       ▼
//!   NodeStore::update()   flags propagate, matrices/colors recompute,
//!       │                 touch targets collected in draw order
//!       ▼
//!   NodeStore::draw()     ──► BatchSubmitter::submit() per visible batch
//!       │
//!       ▼
//!   TouchRouter::dispatch()  reverse draw order, swallow, begin/move/end
//!       │
//!       ▼
//!   CallbackRegistry::run()  deferred adds/removes merged, then invoked
//! ```
//!
//! **[`node`]**: Struct-of-arrays node tree with generational handles. Local
//! properties are set by the caller; world matrices and colors are computed by
//! the update pass.
//!
//! **[`dirty`]**: The [`ReRender`](dirty::ReRender) bit set. A node's bits are
//! OR-ed into every descendant during the update pass and cleared after draw.
//!
//! **[`batch`]**: Render batches and the
//! [`BatchSubmitter`](batch::BatchSubmitter) trait that GPU backends implement.
//!
//! **[`scene`]**: The scene root, its message bus, and the per-frame touch
//! target list.
//!
//! **[`touch`]**: Pointer samples, per-pointer history, the
//! [`TouchRouter`](touch::TouchRouter), and the gesture listener.
//!
//! **[`engine`]**: The frame driver, application lifecycle, and the deferred
//! per-frame callback registry.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies, the
//!   [`time::now`] helper, and the thread-safe
//!   [`PointerBuffer`](touch::PointerBuffer).
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod batch;
pub mod clock;
pub mod color;
pub mod dirty;
pub mod engine;
pub mod error;
pub mod node;
pub mod scene;
pub mod stats;
pub mod time;
pub mod touch;
pub mod trace;
pub mod transform;
pub mod viewport;

#[cfg(test)]
pub(crate) mod testing;
