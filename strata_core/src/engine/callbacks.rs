// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame callbacks with deferred registration.
//!
//! Registrations and removals are queued in [`PendingCallbacks`] and merged at
//! the start of the callbacks phase, adds before removes. A callback that
//! registers or removes callbacks while running therefore never changes the
//! set being invoked; the change applies from the next frame.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use crate::scene::Scene;
use crate::time::Duration;

/// Handle returned when a frame callback is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallbackId(u32);

impl CallbackId {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A callback invoked once per frame.
pub type FrameCallback = Box<dyn FnMut(&mut FrameContext<'_>)>;

/// Queued callback changes.
#[derive(Default)]
pub struct PendingCallbacks {
    next_id: u32,
    to_add: Vec<(CallbackId, FrameCallback)>,
    to_remove: Vec<CallbackId>,
}

impl fmt::Debug for PendingCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCallbacks")
            .field("to_add", &self.to_add.len())
            .field("to_remove", &self.to_remove)
            .finish_non_exhaustive()
    }
}

impl PendingCallbacks {
    /// Queues `f` for registration. It first runs on the next callbacks phase.
    pub fn register(&mut self, f: impl FnMut(&mut FrameContext<'_>) + 'static) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.to_add.push((id, Box::new(f)));
        id
    }

    /// Queues `id` for removal. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: CallbackId) {
        self.to_remove.push(id);
    }

    /// Whether no change is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// What a frame callback sees while it runs.
pub struct FrameContext<'a> {
    id: CallbackId,
    delta: Duration,
    frame_index: u64,
    scene: Option<&'a mut Scene>,
    callbacks: &'a mut PendingCallbacks,
}

impl fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("id", &self.id)
            .field("delta", &self.delta)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl FrameContext<'_> {
    /// The running callback.
    #[must_use]
    pub fn id(&self) -> CallbackId {
        self.id
    }

    /// Time since the previous frame.
    #[must_use]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Index of the current frame.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The active scene, if one is loaded.
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_deref_mut()
    }

    /// Queues a new callback for the next frame.
    pub fn register_callback(
        &mut self,
        f: impl FnMut(&mut FrameContext<'_>) + 'static,
    ) -> CallbackId {
        self.callbacks.register(f)
    }

    /// Queues removal of `id`.
    pub fn remove_callback(&mut self, id: CallbackId) {
        self.callbacks.remove(id);
    }

    /// Queues removal of the running callback.
    pub fn remove_self(&mut self) {
        self.callbacks.remove(self.id);
    }
}

/// Active frame callbacks plus their queued changes.
#[derive(Default)]
pub struct CallbackRegistry {
    active: BTreeMap<CallbackId, FrameCallback>,
    pending: PendingCallbacks,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("active", &self.active.keys().collect::<Vec<_>>())
            .field("pending", &self.pending)
            .finish()
    }
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued changes.
    pub fn pending_mut(&mut self) -> &mut PendingCallbacks {
        &mut self.pending
    }

    /// Number of active callbacks. Queued registrations are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no callback is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Merges queued changes, then invokes every active callback in id order.
    /// Returns the number of callbacks invoked.
    pub fn run(&mut self, delta: Duration, frame_index: u64, mut scene: Option<&mut Scene>) -> u32 {
        self.merge();
        let mut invoked = 0;
        for (&id, f) in &mut self.active {
            let mut cx = FrameContext {
                id,
                delta,
                frame_index,
                scene: scene.as_deref_mut(),
                callbacks: &mut self.pending,
            };
            f(&mut cx);
            invoked += 1;
        }
        invoked
    }

    fn merge(&mut self) {
        for (id, f) in self.pending.to_add.drain(..) {
            self.active.insert(id, f);
        }
        for id in self.pending.to_remove.drain(..) {
            self.active.remove(&id);
        }
    }
}
