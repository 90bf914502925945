// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap and hover semantics over raw touch events.

use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use core::fmt;

use super::{Touch, TouchContext, TouchListener};
use crate::node::NodeId;

type BeginHandler = Box<dyn FnMut(&Touch, NodeId) -> bool>;
type Handler = Box<dyn FnMut(&Touch, NodeId)>;

/// A [`TouchListener`] that tracks which pointers began on its node and
/// whether they are currently inside it.
///
/// For a pointer that began on the node:
///
/// - `on_enter` fires when the press lands and whenever the pointer moves
///   back inside;
/// - `on_over` fires for moves that stay inside;
/// - `on_exit` fires when the pointer moves out, or on release while inside;
/// - `on_tap` fires on release inside the node;
/// - `on_move` and `on_end` fire for every move and the release.
///
/// Pointers that began elsewhere are ignored. `on_begin` may reject a press by
/// returning `false`, in which case the pointer is not tracked.
pub struct GestureListener {
    enabled: bool,
    began: BTreeSet<u32>,
    inside: BTreeSet<u32>,
    on_begin: Option<BeginHandler>,
    on_move: Option<Handler>,
    on_end: Option<Handler>,
    on_tap: Option<Handler>,
    on_enter: Option<Handler>,
    on_over: Option<Handler>,
    on_exit: Option<Handler>,
}

impl fmt::Debug for GestureListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureListener")
            .field("enabled", &self.enabled)
            .field("began", &self.began)
            .field("inside", &self.inside)
            .finish_non_exhaustive()
    }
}

impl Default for GestureListener {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureListener {
    /// Creates an enabled listener with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            began: BTreeSet::new(),
            inside: BTreeSet::new(),
            on_begin: None,
            on_move: None,
            on_end: None,
            on_tap: None,
            on_enter: None,
            on_over: None,
            on_exit: None,
        }
    }

    /// Enables or disables the listener. A disabled listener accepts nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Pointers that began on the node and are not yet released.
    pub fn tracked(&self) -> impl Iterator<Item = u32> + '_ {
        self.began.iter().copied()
    }

    /// Sets the press filter.
    #[must_use]
    pub fn on_begin(mut self, f: impl FnMut(&Touch, NodeId) -> bool + 'static) -> Self {
        self.on_begin = Some(Box::new(f));
        self
    }

    /// Sets the move handler.
    #[must_use]
    pub fn on_move(mut self, f: impl FnMut(&Touch, NodeId) + 'static) -> Self {
        self.on_move = Some(Box::new(f));
        self
    }

    /// Sets the release handler.
    #[must_use]
    pub fn on_end(mut self, f: impl FnMut(&Touch, NodeId) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    /// Sets the tap handler.
    #[must_use]
    pub fn on_tap(mut self, f: impl FnMut(&Touch, NodeId) + 'static) -> Self {
        self.on_tap = Some(Box::new(f));
        self
    }

    /// Sets the enter handler.
    #[must_use]
    pub fn on_enter(mut self, f: impl FnMut(&Touch, NodeId) + 'static) -> Self {
        self.on_enter = Some(Box::new(f));
        self
    }

    /// Sets the over handler.
    #[must_use]
    pub fn on_over(mut self, f: impl FnMut(&Touch, NodeId) + 'static) -> Self {
        self.on_over = Some(Box::new(f));
        self
    }

    /// Sets the exit handler.
    #[must_use]
    pub fn on_exit(mut self, f: impl FnMut(&Touch, NodeId) + 'static) -> Self {
        self.on_exit = Some(Box::new(f));
        self
    }
}

fn fire(handler: &mut Option<Handler>, touch: &Touch, node: NodeId) {
    if let Some(h) = handler {
        h(touch, node);
    }
}

impl TouchListener for GestureListener {
    fn touch_begin(&mut self, touch: &Touch, cx: &TouchContext) -> bool {
        if !self.enabled {
            return false;
        }
        let accepted = self.on_begin.as_mut().is_none_or(|f| f(touch, cx.node));
        if accepted {
            self.began.insert(touch.id);
            self.inside.insert(touch.id);
            fire(&mut self.on_enter, touch, cx.node);
        }
        accepted
    }

    fn touch_move(&mut self, touch: &Touch, cx: &TouchContext) {
        if !self.began.contains(&touch.id) {
            return;
        }
        if cx.contains {
            if self.inside.insert(touch.id) {
                fire(&mut self.on_enter, touch, cx.node);
            } else {
                fire(&mut self.on_over, touch, cx.node);
            }
        } else if self.inside.remove(&touch.id) {
            fire(&mut self.on_exit, touch, cx.node);
        }
        fire(&mut self.on_move, touch, cx.node);
    }

    fn touch_end(&mut self, touch: &Touch, cx: &TouchContext) {
        if !self.began.remove(&touch.id) {
            return;
        }
        fire(&mut self.on_end, touch, cx.node);
        if cx.contains {
            fire(&mut self.on_tap, touch, cx.node);
        }
        if self.inside.remove(&touch.id) {
            fire(&mut self.on_exit, touch, cx.node);
        }
    }
}
