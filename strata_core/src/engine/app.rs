// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The application boundary.

use core::fmt;

use super::callbacks::{CallbackId, FrameContext, PendingCallbacks};
use crate::scene::{AppHandle, Scene};
use crate::viewport::Viewport;

/// Lifecycle hooks invoked by an [`Engine`](super::Engine).
///
/// `on_load` runs once, on the first start. `on_resume` runs on every start,
/// after `on_load` the first time. `on_pause` runs on every stop.
/// `on_dispose` runs when the engine is dropped.
pub trait Application {
    /// First start. Typically builds and loads the first scene.
    fn on_load(&mut self, cx: &mut AppContext<'_>) {
        _ = cx;
    }

    /// The engine started running.
    fn on_resume(&mut self, cx: &mut AppContext<'_>) {
        _ = cx;
    }

    /// The engine is about to stop.
    fn on_pause(&mut self, cx: &mut AppContext<'_>) {
        _ = cx;
    }

    /// The host is short on memory.
    fn on_low_memory(&mut self, cx: &mut AppContext<'_>) {
        _ = cx;
    }

    /// The engine is being dropped.
    fn on_dispose(&mut self) {}
}

/// Engine state an [`Application`] may touch from its lifecycle hooks.
pub struct AppContext<'a> {
    pub(crate) handle: AppHandle,
    pub(crate) scene: &'a mut Option<Scene>,
    pub(crate) callbacks: &'a mut PendingCallbacks,
    pub(crate) viewport: &'a mut Viewport,
    pub(crate) scene_swapped: bool,
}

impl fmt::Debug for AppContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("handle", &self.handle)
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}

impl AppContext<'_> {
    /// The handle scenes loaded through this context are tagged with.
    #[must_use]
    pub fn handle(&self) -> AppHandle {
        self.handle
    }

    /// Makes `scene` the active scene and returns the previous one.
    pub fn load_scene(&mut self, scene: Scene) -> Option<Scene> {
        self.scene_swapped = true;
        load_scene(self.scene, self.handle, scene)
    }

    /// The active scene.
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Queues a per-frame callback.
    pub fn register_callback(
        &mut self,
        f: impl FnMut(&mut FrameContext<'_>) + 'static,
    ) -> CallbackId {
        self.callbacks.register(f)
    }

    /// Queues removal of a per-frame callback.
    pub fn remove_callback(&mut self, id: CallbackId) {
        self.callbacks.remove(id);
    }

    /// The output surface sizes.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        self.viewport
    }
}

/// Swaps in `scene`, tagging it with `handle` and untagging the old one.
pub(crate) fn load_scene(
    slot: &mut Option<Scene>,
    handle: AppHandle,
    mut scene: Scene,
) -> Option<Scene> {
    scene.set_app(Some(handle));
    let mut old = slot.replace(scene);
    if let Some(old) = &mut old {
        old.set_app(None);
    }
    old
}
