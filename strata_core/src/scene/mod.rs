// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: a node tree with a root group, a message bus, and the touch
//! targets collected by the last update.
//!
//! An engine owns at most one active scene at a time. Loading a scene moves
//! it into the engine, so a scene can never be driven by two engines.

mod bus;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::batch::BatchSubmitter;
use crate::error::FrameError;
use crate::node::{DrawStats, NodeId, NodeStore, UpdateStats};
use crate::touch::{DispatchedTouch, PointerSamples, TouchRouter};

pub use bus::{MessageBus, SubscriptionId};

/// Identifies the application an engine was created for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AppHandle(pub(crate) u32);

impl AppHandle {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

type UpdateHook = Box<dyn FnMut(&mut NodeStore, NodeId, f32)>;

/// A node tree plus scene-level services.
pub struct Scene {
    nodes: NodeStore,
    root: NodeId,
    bus: MessageBus,
    app: Option<AppHandle>,
    touch_targets: Vec<NodeId>,
    update_hook: Option<UpdateHook>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("root", &self.root)
            .field("nodes", &self.nodes.node_count())
            .field("app", &self.app)
            .field("touch_targets", &self.touch_targets.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene with an empty root group.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = NodeStore::new();
        let root = nodes.create_group();
        Self {
            nodes,
            root,
            bus: MessageBus::new(),
            app: None,
            touch_targets: Vec::new(),
            update_hook: None,
        }
    }

    /// The root group.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node store.
    #[must_use]
    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    /// The node store, mutably.
    pub fn nodes_mut(&mut self) -> &mut NodeStore {
        &mut self.nodes
    }

    /// Appends `child` to the root group.
    pub fn add(&mut self, child: NodeId) {
        self.nodes.add_child(self.root, child);
    }

    /// Removes and destroys a direct child of the root group.
    pub fn remove(&mut self, child: NodeId) {
        self.nodes.remove_child(self.root, child);
    }

    /// Removes and destroys every child of the root group.
    pub fn remove_all(&mut self) {
        self.nodes.remove_all_children(self.root);
    }

    /// The scene's message bus.
    #[must_use]
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// The scene's message bus, mutably.
    pub fn bus_mut(&mut self) -> &mut MessageBus {
        &mut self.bus
    }

    /// The application whose engine is driving this scene, if any.
    #[must_use]
    pub fn app(&self) -> Option<AppHandle> {
        self.app
    }

    pub(crate) fn set_app(&mut self, app: Option<AppHandle>) {
        self.app = app;
    }

    /// Installs a hook run at the start of every update, before any node is
    /// visited.
    pub fn set_update_hook(&mut self, hook: impl FnMut(&mut NodeStore, NodeId, f32) + 'static) {
        self.update_hook = Some(Box::new(hook));
    }

    /// Removes the update hook.
    pub fn clear_update_hook(&mut self) {
        self.update_hook = None;
    }

    /// Touch-enabled visible nodes collected by the last update, in draw order.
    /// Empty after touches have been dispatched.
    #[must_use]
    pub fn touch_targets(&self) -> &[NodeId] {
        &self.touch_targets
    }

    /// Runs the update hook, then the update pass from the root.
    pub fn update(&mut self, delta: f32) -> UpdateStats {
        if let Some(hook) = &mut self.update_hook {
            hook(&mut self.nodes, self.root, delta);
        }
        self.nodes.update(self.root, &mut self.touch_targets)
    }

    /// Runs the draw pass from the root.
    ///
    /// # Errors
    ///
    /// Returns the first submission failure.
    pub fn draw(&mut self, submitter: &mut dyn BatchSubmitter) -> Result<DrawStats, FrameError> {
        self.nodes.draw(self.root, submitter)
    }

    /// Routes a frame of pointer samples to the collected touch targets.
    pub fn dispatch_touches(
        &mut self,
        router: &mut TouchRouter,
        delta: f32,
        samples: &PointerSamples,
    ) -> Vec<DispatchedTouch> {
        router.dispatch(delta, samples, &mut self.nodes, &mut self.touch_targets)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::*;
    use crate::batch::RenderBatch;
    use crate::testing::{RecordingListener, RecordingSubmitter};
    use crate::touch::{PointerPhase, PointerSample, Touchable};

    #[test]
    fn add_and_remove_under_root() {
        let mut scene = Scene::new();
        let n = scene.nodes_mut().create_drawable(RenderBatch::new());
        scene.add(n);
        assert_eq!(scene.nodes().parent(n), Some(scene.root()));
        scene.remove(n);
        assert!(!scene.nodes().is_alive(n));

        let a = scene.nodes_mut().create_group();
        let b = scene.nodes_mut().create_group();
        scene.add(a);
        scene.add(b);
        scene.remove_all();
        assert_eq!(scene.nodes().child_count(scene.root()), 0);
    }

    #[test]
    fn update_hook_runs_before_the_pass() {
        let mut scene = Scene::new();
        let n = scene.nodes_mut().create_drawable(RenderBatch::new());
        scene.add(n);
        scene.set_update_hook(move |nodes, _root, delta| {
            let x = nodes.transform(n).position().x;
            nodes.set_position(n, Point::new(x + f64::from(delta) * 60.0, 0.0));
        });

        scene.update(0.5);
        let mut sub = RecordingSubmitter::default();
        scene.draw(&mut sub).unwrap();
        assert_eq!(scene.nodes().world_transform(n).translation(), Vec2::new(30.0, 0.0));

        scene.clear_update_hook();
        scene.update(0.5);
        assert_eq!(scene.nodes().transform(n).position(), Point::new(30.0, 0.0));
    }

    #[test]
    fn touch_targets_are_consumed_by_dispatch() {
        let mut scene = Scene::new();
        let n = scene.nodes_mut().create_group();
        scene.nodes_mut().set_touchable(n, Some(Touchable::new(RecordingListener::default())));
        scene.add(n);
        scene.update(0.0);
        assert_eq!(scene.touch_targets(), [n]);

        let mut router = TouchRouter::default();
        let mut samples = PointerSamples::new();
        samples.insert(0, PointerSample::new(PointerPhase::Down, 0.0, 0.0));
        scene.dispatch_touches(&mut router, 0.0, &samples);
        assert!(scene.touch_targets().is_empty());
    }
}
