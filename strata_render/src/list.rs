// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame draw list.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use strata_core::batch::{BatchSubmitter, DrawCall, TextureId};
use strata_core::color::Color;
use strata_core::dirty::ReRender;
use strata_core::error::SubmitError;
use strata_core::node::NodeId;

use crate::uploads::UploadCounts;

/// A single submitted batch.
///
/// Items are recorded in submission order, which is the scene's draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawItem {
    /// The node the batch belongs to.
    pub node: NodeId,
    /// World transform (column-major 4x4).
    pub matrix: [f32; 16],
    /// World color as RGBA.
    pub color: [f32; 4],
    /// Bound texture, if any.
    pub texture: Option<TextureId>,
    /// Parts re-uploaded for this submission.
    pub uploads: ReRender,
    /// Number of indices to draw.
    pub index_count: usize,
}

/// Records the batches of one frame.
///
/// When textures have been registered with
/// [`register_texture`](Self::register_texture), a batch bound to an
/// unregistered texture is rejected with [`SubmitError::UnknownTexture`].
/// With a budget set, submissions beyond it are rejected with
/// [`SubmitError::ResourceExhausted`].
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    uploads: UploadCounts,
    clear_color: Option<Color>,
    textures: BTreeSet<TextureId>,
    budget: Option<usize>,
}

impl DrawList {
    /// Creates an empty list with no texture registry and no budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this list limited to `max_items` submissions per frame.
    #[must_use]
    pub fn with_budget(mut self, max_items: usize) -> Self {
        self.budget = Some(max_items);
        self
    }

    /// Makes `texture` known. Once any texture is registered, only registered
    /// textures are accepted.
    pub fn register_texture(&mut self, texture: TextureId) {
        self.textures.insert(texture);
    }

    /// Items recorded since the last [`clear`](Self::clear).
    #[must_use]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Upload counters since the last [`clear`](Self::clear).
    #[must_use]
    pub fn uploads(&self) -> UploadCounts {
        self.uploads
    }

    /// The color the frame was cleared to, if a frame has begun since the
    /// last [`clear`](Self::clear).
    #[must_use]
    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    /// The item recorded for `node`, if it was submitted.
    #[must_use]
    pub fn item_for(&self, node: NodeId) -> Option<&DrawItem> {
        self.items.iter().find(|item| item.node == node)
    }

    /// Nodes in submission order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().map(|item| item.node)
    }

    /// Clears recorded items and counters for reuse. Registered textures and
    /// the budget are kept.
    pub fn clear(&mut self) {
        self.items.clear();
        self.uploads = UploadCounts::default();
        self.clear_color = None;
    }
}

impl BatchSubmitter for DrawList {
    fn begin_frame(&mut self, clear_color: Color) {
        self.clear_color = Some(clear_color);
    }

    fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError> {
        if self.budget.is_some_and(|max| self.items.len() >= max) {
            return Err(SubmitError::ResourceExhausted);
        }
        let texture = call.batch.texture();
        if let Some(t) = texture
            && !self.textures.is_empty()
            && !self.textures.contains(&t)
        {
            return Err(SubmitError::UnknownTexture(t.0));
        }
        self.uploads += UploadCounts::of(call.uploads);
        let uniforms = call.uniforms();
        let mut matrix = [0.0; 16];
        matrix.copy_from_slice(&uniforms[..16]);
        let mut color = [0.0; 4];
        color.copy_from_slice(&uniforms[16..]);
        self.items.push(DrawItem {
            node: call.node,
            matrix,
            color,
            texture,
            uploads: call.uploads,
            index_count: call.batch.indices().len(),
        });
        Ok(())
    }
}
