// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame upload counters.

use core::ops::AddAssign;

use strata_core::dirty::ReRender;

/// Number of submissions that required each kind of re-upload.
///
/// A submission is counted once per set bit, so a fresh batch (all bits set)
/// contributes to every counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadCounts {
    /// Matrix or vertex re-uploads.
    pub vertex: u32,
    /// Color uniform updates.
    pub color: u32,
    /// Texture rebinds.
    pub texture: u32,
    /// Texture-coordinate re-uploads.
    pub tex_coords: u32,
}

impl UploadCounts {
    /// Counts the bits of one submission.
    #[must_use]
    pub fn of(flags: ReRender) -> Self {
        let bit = |f| u32::from(flags.contains(f));
        Self {
            vertex: bit(ReRender::VERTEX),
            color: bit(ReRender::COLOR),
            texture: bit(ReRender::TEXTURE),
            tex_coords: bit(ReRender::TEX_COORDS),
        }
    }

    /// Sum of all counters.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.vertex + self.color + self.texture + self.tex_coords
    }

    /// Whether nothing was uploaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for UploadCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.vertex += rhs.vertex;
        self.color += rhs.color;
        self.texture += rhs.texture;
        self.tex_coords += rhs.tex_coords;
    }
}
