// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render batches and the GPU submission boundary.
//!
//! A drawable node owns one [`RenderBatch`]: its vertex, texture-coordinate,
//! and index data plus a texture binding. The draw pass hands each visible
//! batch to a [`BatchSubmitter`] as a [`DrawCall`] carrying the node's world
//! matrix and world color. [`DrawCall::uploads`] names the parts of the batch
//! that changed since the batch was last submitted; everything else may be
//! reused from the backend's previous upload.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Size};

use crate::color::Color;
use crate::dirty::ReRender;
use crate::error::SubmitError;
use crate::node::NodeId;
use crate::transform::draw_uniforms;

/// An opaque reference to a GPU texture owned by the backend.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

/// Geometry and texture binding for one drawable node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderBatch {
    texture: Option<TextureId>,
    vertices: Vec<[f32; 2]>,
    tex_coords: Vec<[f32; 2]>,
    indices: Vec<u16>,
    pending: ReRender,
    submissions: u64,
}

impl RenderBatch {
    /// Creates an empty batch. Everything is pending until first submission.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: ReRender::ALL,
            ..Self::default()
        }
    }

    /// Creates a two-triangle quad covering `(0, 0)..size` with unit texture
    /// coordinates.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "vertex data is single precision"
    )]
    #[must_use]
    pub fn quad(size: Size) -> Self {
        let (w, h) = (size.width as f32, size.height as f32);
        Self {
            vertices: Vec::from([[0.0, 0.0], [w, 0.0], [0.0, h], [w, h]]),
            tex_coords: Vec::from([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]),
            indices: Vec::from([0, 1, 2, 2, 1, 3]),
            ..Self::new()
        }
    }

    /// Returns this batch bound to `texture`.
    #[must_use]
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Bound texture, if any.
    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Vertex positions in node-local space.
    #[must_use]
    pub fn vertices(&self) -> &[[f32; 2]] {
        &self.vertices
    }

    /// Texture coordinates, parallel to [`vertices`](Self::vertices).
    #[must_use]
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    /// Triangle-list indices into [`vertices`](Self::vertices).
    #[must_use]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Parts of the batch changed since its last successful submission.
    #[must_use]
    pub fn pending_uploads(&self) -> ReRender {
        self.pending
    }

    /// Number of successful submissions so far.
    #[must_use]
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    /// Marks parts of the batch as needing re-upload.
    pub fn mark(&mut self, flags: ReRender) {
        self.pending |= flags;
    }

    pub(crate) fn set_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
    }

    pub(crate) fn set_geometry(&mut self, vertices: Vec<[f32; 2]>, indices: Vec<u16>) {
        self.vertices = vertices;
        self.indices = indices;
    }

    pub(crate) fn set_tex_coords(&mut self, tex_coords: Vec<[f32; 2]>) {
        self.tex_coords = tex_coords;
    }

    pub(crate) fn submitted(&mut self) {
        self.pending = ReRender::NONE;
        self.submissions += 1;
    }
}

/// One batch submission handed to a [`BatchSubmitter`].
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    /// The node that owns the batch.
    pub node: NodeId,
    /// World matrix of the node.
    pub matrix: Affine,
    /// World color of the node.
    pub color: Color,
    /// The batch itself.
    pub batch: &'a RenderBatch,
    /// Parts that must be re-uploaded before drawing.
    pub uploads: ReRender,
}

impl DrawCall<'_> {
    /// The column-major matrix and the color packed as one uniform block.
    #[must_use]
    pub fn uniforms(&self) -> [f32; 20] {
        draw_uniforms(self.matrix, self.color)
    }
}

/// The GPU-facing side of the draw pass.
///
/// Backends implement this to record or issue draw commands. Calls arrive in
/// draw order: parent before children, siblings by ascending z-index.
pub trait BatchSubmitter {
    /// Starts a frame by clearing the target to `clear_color`.
    ///
    /// Called once per frame before the first [`submit`](Self::submit).
    fn begin_frame(&mut self, clear_color: Color) {
        _ = clear_color;
    }

    /// Submits one batch.
    ///
    /// On error the draw pass stops and the batch keeps its pending uploads.
    fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError>;
}

impl<S: BatchSubmitter + ?Sized> BatchSubmitter for &mut S {
    fn begin_frame(&mut self, clear_color: Color) {
        (**self).begin_frame(clear_color);
    }

    fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError> {
        (**self).submit(call)
    }
}
