// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Re-render flags.
//!
//! Every node carries a [`ReRender`] bit set naming which of its derived
//! values must be recomputed on the next frame.
//!
//! # Propagation semantics
//!
//! - Setters on a node OR the matching bit into that node's own flags:
//!   [`VERTEX`](ReRender::VERTEX) for position, rotation, scale, anchor, size
//!   and vertex data; [`COLOR`](ReRender::COLOR) for the color multiplier;
//!   [`TEXTURE`](ReRender::TEXTURE) and [`TEX_COORDS`](ReRender::TEX_COORDS)
//!   for batch contents. Attaching a node to a parent sets
//!   [`ALL`](ReRender::ALL).
//!
//! - During the update pass each node's flags are OR-ed with its parent's
//!   effective flags before any recomputation. Inherited bits are applied to
//!   the node's stored flags for the remainder of the frame only.
//!
//! - The draw pass resets every visited node's flags to
//!   [`NONE`](ReRender::NONE), so a bit set before frame N is observed by
//!   exactly frame N.

bitflags::bitflags! {
    /// A set of re-render bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ReRender: u8 {
        /// World matrix must be recomputed and vertices re-uploaded.
        const VERTEX = 1 << 0;
        /// World color must be recomputed.
        const COLOR = 1 << 1;
        /// Texture binding changed.
        const TEXTURE = 1 << 2;
        /// Texture coordinates changed.
        const TEX_COORDS = 1 << 3;
    }
}

impl ReRender {
    /// Nothing to recompute.
    pub const NONE: Self = Self::empty();
    /// Every bit.
    pub const ALL: Self = Self::all();
}

impl Default for ReRender {
    fn default() -> Self {
        Self::NONE
    }
}
