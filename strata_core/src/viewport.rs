// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display, view, and scene-space sizes.
//!
//! Three sizes describe the output surface:
//!
//! - **display**: physical pixels of the render target;
//! - **view**: the coordinate space pointer samples arrive in;
//! - **screen**: scene units. By default the screen is 640 units tall and as
//!   wide as the display's aspect ratio allows, so content authored for that
//!   height scales to any device.
//!
//! Pointer positions are multiplied by
//! [`view_to_scene_scale`](Viewport::view_to_scene_scale) before hit testing.

use kurbo::Size;

/// Scene height used by [`BaseScreen::default`].
pub const BASE_SCREEN_HEIGHT: f64 = 640.0;

/// How the screen (scene-space) size is derived from the display size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BaseScreen {
    /// Screen units equal display pixels.
    Native,
    /// Fixed screen width; height follows the display aspect ratio.
    Width(f64),
    /// Fixed screen height; width follows the display aspect ratio.
    Height(f64),
}

impl Default for BaseScreen {
    fn default() -> Self {
        Self::Height(BASE_SCREEN_HEIGHT)
    }
}

/// Output surface sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    display_size: Size,
    view_size: Size,
    screen_size: Size,
    base: BaseScreen,
    changed: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(BaseScreen::default())
    }
}

impl Viewport {
    /// Creates a viewport with zero sizes.
    #[must_use]
    pub fn new(base: BaseScreen) -> Self {
        Self {
            display_size: Size::ZERO,
            view_size: Size::ZERO,
            screen_size: Size::ZERO,
            base,
            changed: false,
        }
    }

    /// Sets the display and view sizes and re-derives the screen size.
    /// Returns whether anything changed.
    pub fn set_display_size(&mut self, display: Size, view: Size) -> bool {
        if display == self.display_size && view == self.view_size {
            return false;
        }
        self.display_size = display;
        self.view_size = view;
        self.reset_screen_size();
        self.changed = true;
        true
    }

    /// Switches to a fixed screen width.
    pub fn set_screen_size_based_on_width(&mut self, width: f64) {
        self.base = BaseScreen::Width(width);
        self.reset_screen_size();
    }

    /// Switches to a fixed screen height.
    pub fn set_screen_size_based_on_height(&mut self, height: f64) {
        self.base = BaseScreen::Height(height);
        self.reset_screen_size();
    }

    /// Re-derives the screen size from the display size and base.
    pub fn reset_screen_size(&mut self) {
        let d = self.display_size;
        let screen = match self.base {
            BaseScreen::Native => d,
            BaseScreen::Width(w) if d.width > 0.0 => Size::new(w, d.height * w / d.width),
            BaseScreen::Height(h) if d.height > 0.0 => Size::new(d.width * h / d.height, h),
            BaseScreen::Width(w) => Size::new(w, 0.0),
            BaseScreen::Height(h) => Size::new(0.0, h),
        };
        if screen != self.screen_size {
            self.screen_size = screen;
            self.changed = true;
        }
    }

    /// Physical pixels of the render target.
    #[must_use]
    pub fn display_size(&self) -> Size {
        self.display_size
    }

    /// Size of the pointer coordinate space.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Size in scene units.
    #[must_use]
    pub fn screen_size(&self) -> Size {
        self.screen_size
    }

    /// Current base.
    #[must_use]
    pub fn base(&self) -> BaseScreen {
        self.base
    }

    /// Factor from view coordinates to scene units, or 1 before sizes are
    /// known.
    #[must_use]
    pub fn view_to_scene_scale(&self) -> f64 {
        if self.view_size.width > 0.0 && self.screen_size.width > 0.0 {
            self.screen_size.width / self.view_size.width
        } else {
            1.0
        }
    }

    /// Display pixels per scene unit, or 1 before sizes are known.
    #[must_use]
    pub fn screen_scale(&self) -> f64 {
        if self.screen_size.width > 0.0 {
            self.display_size.width / self.screen_size.width
        } else {
            1.0
        }
    }

    /// Returns whether any size changed since the last call, and resets the
    /// indicator.
    pub fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_base_keeps_aspect_ratio() {
        let mut vp = Viewport::default();
        assert!(vp.set_display_size(Size::new(1280.0, 1920.0), Size::new(640.0, 960.0)));
        assert_eq!(vp.screen_size(), Size::new(640.0 * 1280.0 / 1920.0, 640.0));
        assert!(vp.take_changed());
        assert!(!vp.take_changed());
    }

    #[test]
    fn view_to_scene_scale() {
        let mut vp = Viewport::default();
        assert_eq!(vp.view_to_scene_scale(), 1.0);
        vp.set_display_size(Size::new(1000.0, 1280.0), Size::new(500.0, 640.0));
        // Screen is 500×640 units, view is 500 wide.
        assert_eq!(vp.screen_size(), Size::new(500.0, 640.0));
        assert_eq!(vp.view_to_scene_scale(), 1.0);
        assert_eq!(vp.screen_scale(), 2.0);

        vp.set_screen_size_based_on_width(250.0);
        assert_eq!(vp.screen_size(), Size::new(250.0, 320.0));
        assert_eq!(vp.view_to_scene_scale(), 0.5);
    }

    #[test]
    fn unchanged_size_is_not_a_change() {
        let mut vp = Viewport::new(BaseScreen::Native);
        vp.set_display_size(Size::new(10.0, 10.0), Size::new(10.0, 10.0));
        vp.take_changed();
        assert!(!vp.set_display_size(Size::new(10.0, 10.0), Size::new(10.0, 10.0)));
        assert!(!vp.take_changed());
        assert_eq!(vp.screen_size(), Size::new(10.0, 10.0));
    }

    #[test]
    fn zero_display_keeps_base_axis() {
        let mut vp = Viewport::default();
        vp.reset_screen_size();
        assert_eq!(vp.screen_size(), Size::new(0.0, BASE_SCREEN_HEIGHT));
    }
}
