// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The update and draw passes.
//!
//! Both passes walk the tree depth-first in draw order (a node before its
//! children, siblings by ascending z-index):
//!
//! 1. **Update.** Each node ORs its parent's effective flags into its own.
//!    [`VERTEX`](ReRender::VERTEX) recomputes the world matrix as
//!    `parent_world * local`, [`COLOR`](ReRender::COLOR) recomputes the world
//!    color as `parent_color * color`, and any set bit is forwarded to the
//!    node's batch as pending uploads. Stale child orders are re-sorted once.
//!    Visible touch-enabled nodes are appended to the touch target list.
//! 2. **Draw.** Each visible batch is submitted with its world matrix and
//!    color, then every visited node's flags reset to
//!    [`NONE`](ReRender::NONE).
//!
//! The draw pass follows the order cached by the update pass. A node attached
//! after the update is not drawn until the next frame, and mutations made
//! between the two passes of one frame are discarded when the flags reset.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Affine;

use super::id::{INVALID, NodeId};
use super::store::NodeStore;
use crate::batch::{BatchSubmitter, DrawCall};
use crate::dirty::ReRender;
use crate::error::FrameError;
#[cfg(feature = "trace-rich")]
use crate::trace::{NodeChange, NodeField};

/// Counters produced by [`NodeStore::update`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Nodes visited.
    pub nodes_visited: u32,
    /// World matrices recomputed.
    pub matrices_recomputed: u32,
    /// World colors recomputed.
    pub colors_recomputed: u32,
    /// Containers whose child order was re-sorted.
    pub orders_resorted: u32,
    /// Touch targets collected.
    pub touch_targets: u32,
    /// Per-node changes, in visit order.
    #[cfg(feature = "trace-rich")]
    pub changes: Vec<NodeChange>,
}

/// Counters produced by [`NodeStore::draw`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Nodes visited.
    pub nodes_visited: u32,
    /// Batches submitted.
    pub draw_calls: u32,
    /// Submissions that carried at least one pending upload.
    pub uploads: u32,
}

impl NodeStore {
    /// Runs the update pass over the subtree rooted at `root`.
    ///
    /// `touch_targets` is cleared, then filled with every visible node whose
    /// touch configuration is enabled, in draw order.
    pub fn update(&mut self, root: NodeId, touch_targets: &mut Vec<NodeId>) -> UpdateStats {
        self.validate(root);
        touch_targets.clear();
        let mut stats = UpdateStats::default();

        // (slot, parent's effective flags, parent effectively visible)
        let mut stack = vec![(root.idx, ReRender::NONE, true)];
        while let Some((idx, inherited, parent_visible)) = stack.pop() {
            let i = idx as usize;
            stats.nodes_visited += 1;

            self.rerender[i] |= inherited;
            let flags = self.rerender[i];

            if flags.contains(ReRender::VERTEX) {
                let parent_world = match self.parent[i] {
                    INVALID => Affine::IDENTITY,
                    p => self.world_transform[p as usize],
                };
                self.world_transform[i] = parent_world * self.transform[i].local_matrix();
                stats.matrices_recomputed += 1;
                #[cfg(feature = "trace-rich")]
                stats.changes.push(NodeChange {
                    node_index: idx,
                    field: NodeField::Transform,
                });
            }

            if flags.contains(ReRender::COLOR) {
                let parent_color = match self.parent[i] {
                    INVALID => crate::color::Color::WHITE,
                    p => self.world_color[p as usize],
                };
                self.world_color[i] = parent_color * self.transform[i].color();
                stats.colors_recomputed += 1;
                #[cfg(feature = "trace-rich")]
                stats.changes.push(NodeChange {
                    node_index: idx,
                    field: NodeField::Color,
                });
            }

            if !flags.is_empty() {
                if let Some(batch) = &mut self.batch[i] {
                    batch.mark(flags);
                }
            }

            let visible = parent_visible && self.visible[i];
            if visible && self.touch[i].as_ref().is_some_and(|t| t.enabled) {
                touch_targets.push(self.id_at(idx));
                stats.touch_targets += 1;
            }

            if self.container[i] {
                if self.order_stale[i] {
                    self.sort_draw_order(i);
                    stats.orders_resorted += 1;
                    #[cfg(feature = "trace-rich")]
                    stats.changes.push(NodeChange {
                        node_index: idx,
                        field: NodeField::Order,
                    });
                }
                for &c in self.draw_order[i].iter().rev() {
                    stack.push((c, flags, visible));
                }
            }
        }
        stats
    }

    /// Runs the draw pass over the subtree rooted at `root`.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected submission and returns
    /// [`FrameError::Submit`]. Nodes not yet visited keep their flags; the
    /// rejected batch keeps its pending uploads.
    pub fn draw(
        &mut self,
        root: NodeId,
        submitter: &mut dyn BatchSubmitter,
    ) -> Result<DrawStats, FrameError> {
        self.validate(root);
        let mut stats = DrawStats::default();

        let mut stack = vec![(root.idx, true)];
        while let Some((idx, parent_visible)) = stack.pop() {
            let i = idx as usize;
            stats.nodes_visited += 1;
            let visible = parent_visible && self.visible[i];

            if visible {
                if let Some(batch) = &self.batch[i] {
                    let node = self.id_at(idx);
                    let call = DrawCall {
                        node,
                        matrix: self.world_transform[i],
                        color: self.world_color[i],
                        batch,
                        uploads: batch.pending_uploads(),
                    };
                    submitter
                        .submit(&call)
                        .map_err(|source| FrameError::Submit { node, source })?;
                    stats.draw_calls += 1;
                    if !call.uploads.is_empty() {
                        stats.uploads += 1;
                    }
                }
                if let Some(batch) = &mut self.batch[i] {
                    batch.submitted();
                }
            }

            self.rerender[i] = ReRender::NONE;
            for &c in self.draw_order[i].iter().rev() {
                stack.push((c, visible));
            }
        }
        Ok(stats)
    }

    /// Rebuilds a container's cached draw order. The sort is stable, so equal
    /// z-indices keep insertion order.
    fn sort_draw_order(&mut self, i: usize) {
        let mut order = core::mem::take(&mut self.draw_order[i]);
        order.clear();
        order.extend_from_slice(&self.children[i]);
        let z = &self.z_index;
        order.sort_by_key(|&c| z[c as usize]);
        self.draw_order[i] = order;
        self.order_stale[i] = false;
    }
}
