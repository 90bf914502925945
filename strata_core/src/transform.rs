// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local node transform with a cached matrix.
//!
//! A [`Transform`] holds the user-facing placement of a node: position,
//! rotation, scale, anchor, and size, plus an independently tracked color
//! multiplier. The local matrix is derived lazily and cached until one of the
//! geometric fields changes:
//!
//! ```text
//!   local = T(position) · R(rotation) · S(scale) · T(-anchor * size)
//! ```
//!
//! Matrices use kurbo's column-vector convention, so a node's world matrix is
//! `parent_world * local`.

use kurbo::{Affine, Point, Size, Vec2};

use crate::color::Color;

/// Placement and color of a single node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Point,
    rotation: f64,
    scale: Vec2,
    anchor: Point,
    size: Size,
    color: Color,
    local: Affine,
    valid: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Zero position, no rotation, unit scale, zero anchor and size, white.
    pub const IDENTITY: Self = Self {
        position: Point::ORIGIN,
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
        anchor: Point::ORIGIN,
        size: Size::ZERO,
        color: Color::WHITE,
        local: Affine::IDENTITY,
        valid: true,
    };

    /// Position of the anchor point in parent space.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Rotation in radians.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Per-axis scale factors.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Anchor as a fraction of [`size`](Self::size); `(0.5, 0.5)` is the center.
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Point {
        self.anchor
    }

    /// Untransformed content size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Color multiplier.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns whether the cached local matrix is current.
    #[inline]
    #[must_use]
    pub const fn is_matrix_valid(&self) -> bool {
        self.valid
    }

    /// Sets the position and invalidates the matrix.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.valid = false;
    }

    /// Sets the rotation (radians) and invalidates the matrix.
    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
        self.valid = false;
    }

    /// Sets the scale and invalidates the matrix.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.valid = false;
    }

    /// Sets the anchor and invalidates the matrix.
    pub fn set_anchor(&mut self, anchor: Point) {
        self.anchor = anchor;
        self.valid = false;
    }

    /// Sets the size and invalidates the matrix.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        self.valid = false;
    }

    /// Sets the color multiplier. The matrix is unaffected.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Returns the local matrix, recomputing it first if invalid.
    pub fn local_matrix(&mut self) -> Affine {
        if !self.valid {
            self.local = self.compute_local();
            self.valid = true;
        }
        self.local
    }

    /// Returns the local matrix without touching the cache.
    #[must_use]
    pub fn compute_local(&self) -> Affine {
        let pivot = Vec2::new(
            self.anchor.x * self.size.width,
            self.anchor.y * self.size.height,
        );
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::translate(-pivot)
    }
}

/// Expands a 2D affine into a column-major 4×4 matrix for GPU upload.
#[expect(
    clippy::cast_possible_truncation,
    reason = "GPU matrices are single precision"
)]
#[must_use]
pub fn to_cols_4x4(m: Affine) -> [f32; 16] {
    let [a, b, c, d, e, f] = m.as_coeffs();
    [
        a as f32, b as f32, 0.0, 0.0, //
        c as f32, d as f32, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        e as f32, f as f32, 0.0, 1.0,
    ]
}

/// Packs a world matrix and world color into the 20-float uniform block a
/// vertex shader consumes: 16 matrix floats followed by RGBA.
#[must_use]
pub fn draw_uniforms(m: Affine, color: Color) -> [f32; 20] {
    let mut out = [0.0; 20];
    out[..16].copy_from_slice(&to_cols_4x4(m));
    out[16..].copy_from_slice(&color.to_array());
    out
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn default_is_identity() {
        let mut t = Transform::default();
        assert!(t.is_matrix_valid());
        assert_eq!(t.local_matrix(), Affine::IDENTITY);
    }

    #[test]
    fn setters_invalidate_the_matrix() {
        let mut t = Transform::default();
        t.set_position(Point::new(3.0, 4.0));
        assert!(!t.is_matrix_valid());
        let m = t.local_matrix();
        assert!(t.is_matrix_valid());
        assert_eq!(m * Point::ORIGIN, Point::new(3.0, 4.0));
    }

    #[test]
    fn color_does_not_invalidate_the_matrix() {
        let mut t = Transform::default();
        t.set_color(Color::BLACK);
        assert!(t.is_matrix_valid());
        assert_eq!(t.color(), Color::BLACK);
    }

    #[test]
    fn anchor_is_a_fraction_of_size() {
        let mut t = Transform::default();
        t.set_size(Size::new(10.0, 20.0));
        t.set_anchor(Point::new(0.5, 0.5));
        t.set_position(Point::new(100.0, 100.0));
        let m = t.local_matrix();
        // The content center lands on the position.
        assert!(approx(m * Point::new(5.0, 10.0), Point::new(100.0, 100.0)));
        assert!(approx(m * Point::ORIGIN, Point::new(95.0, 90.0)));
    }

    #[test]
    fn scale_then_rotate_about_anchor() {
        let mut t = Transform::default();
        t.set_size(Size::new(2.0, 2.0));
        t.set_anchor(Point::new(0.5, 0.5));
        t.set_scale(Vec2::new(2.0, 2.0));
        t.set_rotation(FRAC_PI_2);
        let m = t.local_matrix();
        // (2, 1) is one unit right of the pivot; scaled to 2, rotated a
        // quarter turn onto +y.
        assert!(approx(m * Point::new(2.0, 1.0), Point::new(0.0, 2.0)));
    }

    #[test]
    fn column_major_layout() {
        let m = Affine::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let cols = to_cols_4x4(m);
        assert_eq!(&cols[0..4], &[1.0, 2.0, 0.0, 0.0]);
        assert_eq!(&cols[4..8], &[3.0, 4.0, 0.0, 0.0]);
        assert_eq!(&cols[8..12], &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(&cols[12..16], &[5.0, 6.0, 0.0, 1.0]);
    }

    #[test]
    fn uniforms_append_color() {
        let u = draw_uniforms(Affine::IDENTITY, Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(u[0], 1.0);
        assert_eq!(u[15], 1.0);
        assert_eq!(&u[16..], &[0.1, 0.2, 0.3, 0.4]);
    }
}
