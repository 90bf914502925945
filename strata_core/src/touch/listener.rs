// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node touch configuration and the listener trait.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Rect, Size};

use super::Touch;
use crate::node::NodeId;

/// Node-specific facts passed alongside each touch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchContext {
    /// The node receiving the event.
    pub node: NodeId,
    /// Whether the node's hit shape contains the event position.
    pub contains: bool,
}

/// Receives touch events routed to one node.
///
/// All methods default to no-ops.
pub trait TouchListener {
    /// A press landed inside the node. Return `true` to accept it; an accepting
    /// swallowing node stops the press from reaching nodes beneath it.
    fn touch_begin(&mut self, touch: &Touch, cx: &TouchContext) -> bool {
        _ = (touch, cx);
        true
    }

    /// A pointer moved. Delivered to every touch-enabled node.
    fn touch_move(&mut self, touch: &Touch, cx: &TouchContext) {
        _ = (touch, cx);
    }

    /// A pointer was released. Delivered to every touch-enabled node.
    fn touch_end(&mut self, touch: &Touch, cx: &TouchContext) {
        _ = (touch, cx);
    }
}

/// Region of a node that reacts to presses, in node-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitShape {
    /// The node's `(0, 0)..size` bounds.
    Bounds,
    /// The ellipse inscribed in the node's bounds.
    Ellipse,
    /// An explicit local rectangle.
    Rect(Rect),
}

impl HitShape {
    /// Returns whether the node-local `point` is inside the shape for a node of
    /// the given `size`.
    #[must_use]
    pub fn contains(&self, point: Point, size: Size) -> bool {
        match *self {
            Self::Bounds => {
                point.x >= 0.0
                    && point.y >= 0.0
                    && point.x <= size.width
                    && point.y <= size.height
            }
            Self::Ellipse => {
                let (rx, ry) = (size.width * 0.5, size.height * 0.5);
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (point.x - rx) / rx;
                let dy = (point.y - ry) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Self::Rect(rect) => {
                point.x >= rect.x0 && point.y >= rect.y0 && point.x <= rect.x1 && point.y <= rect.y1
            }
        }
    }
}

/// Touch configuration attached to a node.
pub struct Touchable {
    /// Whether the node is collected as a touch target.
    pub enabled: bool,
    /// Whether an accepted press stops at this node.
    pub swallow: bool,
    /// Hit region.
    pub shape: HitShape,
    listener: Box<dyn TouchListener>,
}

impl Touchable {
    /// Creates an enabled, non-swallowing touchable over the node's bounds.
    pub fn new(listener: impl TouchListener + 'static) -> Self {
        Self {
            enabled: true,
            swallow: false,
            shape: HitShape::Bounds,
            listener: Box::new(listener),
        }
    }

    /// Sets whether accepted presses stop here.
    #[must_use]
    pub fn with_swallow(mut self, swallow: bool) -> Self {
        self.swallow = swallow;
        self
    }

    /// Sets the hit shape.
    #[must_use]
    pub fn with_shape(mut self, shape: HitShape) -> Self {
        self.shape = shape;
        self
    }

    /// The listener.
    #[must_use]
    pub fn listener(&self) -> &dyn TouchListener {
        &*self.listener
    }

    /// The listener, mutably.
    pub fn listener_mut(&mut self) -> &mut dyn TouchListener {
        &mut *self.listener
    }
}

impl fmt::Debug for Touchable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Touchable")
            .field("enabled", &self.enabled)
            .field("swallow", &self.swallow)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_include_edges() {
        let size = Size::new(10.0, 4.0);
        assert!(HitShape::Bounds.contains(Point::new(0.0, 0.0), size));
        assert!(HitShape::Bounds.contains(Point::new(10.0, 4.0), size));
        assert!(!HitShape::Bounds.contains(Point::new(10.1, 2.0), size));
        assert!(!HitShape::Bounds.contains(Point::new(-0.1, 2.0), size));
    }

    #[test]
    fn ellipse_excludes_corners() {
        let size = Size::new(10.0, 10.0);
        assert!(HitShape::Ellipse.contains(Point::new(5.0, 5.0), size));
        assert!(HitShape::Ellipse.contains(Point::new(5.0, 0.0), size));
        assert!(!HitShape::Ellipse.contains(Point::new(0.5, 0.5), size));
        assert!(!HitShape::Ellipse.contains(Point::new(5.0, 5.0), Size::ZERO));
    }

    #[test]
    fn explicit_rect() {
        let shape = HitShape::Rect(Rect::new(-5.0, -5.0, 5.0, 5.0));
        assert!(shape.contains(Point::new(-4.0, 4.0), Size::ZERO));
        assert!(!shape.contains(Point::new(6.0, 0.0), Size::ZERO));
    }
}
