// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property
//! management.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Size, Vec2};

use super::id::{INVALID, NodeId};
use super::traverse::Children;
use crate::batch::{RenderBatch, TextureId};
use crate::color::Color;
use crate::dirty::ReRender;
use crate::touch::{HitShape, Touchable};
use crate::transform::Transform;

/// Struct-of-arrays storage for all nodes of a scene.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies a
/// slot in parallel arrays. Destroyed nodes are recycled via a free list, and
/// generation counters make stale handles fail validation.
///
/// Every method taking a [`NodeId`] panics if the handle is stale.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) draw_order: Vec<Vec<u32>>,
    pub(crate) order_stale: Vec<bool>,
    pub(crate) container: Vec<bool>,

    // -- Local properties (set by callers) --
    pub(crate) transform: Vec<Transform>,
    pub(crate) visible: Vec<bool>,
    pub(crate) z_index: Vec<i32>,
    pub(crate) batch: Vec<Option<RenderBatch>>,
    pub(crate) touch: Vec<Option<Touchable>>,

    // -- Computed properties (written by update) --
    pub(crate) world_transform: Vec<Affine>,
    pub(crate) world_color: Vec<Color>,
    pub(crate) rerender: Vec<ReRender>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            draw_order: Vec::new(),
            order_stale: Vec::new(),
            container: Vec::new(),
            transform: Vec::new(),
            visible: Vec::new(),
            z_index: Vec::new(),
            batch: Vec::new(),
            touch: Vec::new(),
            world_transform: Vec::new(),
            world_color: Vec::new(),
            rerender: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a group: a container with no render batch of its own.
    pub fn create_group(&mut self) -> NodeId {
        self.alloc(true, None)
    }

    /// Creates a drawable leaf owning `batch`.
    pub fn create_drawable(&mut self, batch: RenderBatch) -> NodeId {
        self.alloc(false, Some(batch))
    }

    /// Creates a drawable that also accepts children, drawn before them.
    pub fn create_drawable_group(&mut self, batch: RenderBatch) -> NodeId {
        self.alloc(true, Some(batch))
    }

    fn alloc(&mut self, container: bool, batch: Option<RenderBatch>) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.draw_order[i].clear();
            self.order_stale[i] = false;
            self.container[i] = container;
            self.transform[i] = Transform::IDENTITY;
            self.visible[i] = true;
            self.z_index[i] = 0;
            self.batch[i] = batch;
            self.touch[i] = None;
            self.world_transform[i] = Affine::IDENTITY;
            self.world_color[i] = Color::WHITE;
            self.rerender[i] = ReRender::ALL;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.draw_order.push(Vec::new());
            self.order_stale.push(false);
            self.container.push(container);
            self.transform.push(Transform::IDENTITY);
            self.visible.push(true);
            self.z_index.push(0);
            self.batch.push(batch);
            self.touch.push(None);
            self.world_transform.push(Affine::IDENTITY);
            self.world_color.push(Color::WHITE);
            self.rerender.push(ReRender::ALL);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };
        self.id_at(idx)
    }

    /// Destroys a detached node and its whole subtree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node still has a parent (use
    /// [`remove_child`](Self::remove_child) for attached nodes).
    pub fn destroy(&mut self, id: NodeId) {
        self.validate(id);
        assert!(
            self.parent[id.idx as usize] == INVALID,
            "cannot destroy attached node {id:?}; remove it from its parent"
        );
        self.free_subtree(id.idx);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Appends `child` to `parent`'s children.
    ///
    /// The child's re-render flags are set to [`ReRender::ALL`], so its whole
    /// subtree is recomputed under the new ancestry on the next update.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, `parent` is not a container, `child`
    /// already has a parent, or `parent` lies inside `child`'s subtree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.container[p as usize],
            "node {parent:?} is not a container"
        );
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            p != c && !self.is_ancestor(c, p),
            "adding {child:?} under {parent:?} would create a cycle"
        );

        self.parent[c as usize] = p;
        self.children[p as usize].push(c);
        self.order_stale[p as usize] = true;
        self.rerender[c as usize] = ReRender::ALL;
    }

    /// Removes `child` from `parent` and destroys the child's subtree.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == parent.idx,
            "{child:?} is not a child of {parent:?}"
        );
        self.unlink(child.idx);
        self.free_subtree(child.idx);
    }

    /// Removes and destroys every child of `parent`.
    pub fn remove_all_children(&mut self, parent: NodeId) {
        self.validate(parent);
        let p = parent.idx as usize;
        let kids = core::mem::take(&mut self.children[p]);
        self.draw_order[p].clear();
        for c in kids {
            self.parent[c as usize] = INVALID;
            self.free_subtree(c);
        }
    }

    /// Detaches `child` from its parent without destroying it.
    ///
    /// The node stays alive and can be attached elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn detach(&mut self, child: NodeId) {
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] != INVALID,
            "node has no parent"
        );
        self.unlink(child.idx);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        match self.parent[id.idx as usize] {
            INVALID => None,
            p => Some(self.id_at(p)),
        }
    }

    /// Returns an iterator over a node's children in insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.children[id.idx as usize])
    }

    /// Returns an iterator over a node's children in draw order, as sorted by
    /// the most recent [`update`](Self::update).
    #[must_use]
    pub fn draw_order(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.draw_order[id.idx as usize])
    }

    /// Returns the number of children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// Returns whether the node accepts children.
    #[must_use]
    pub fn is_container(&self, id: NodeId) -> bool {
        self.validate(id);
        self.container[id.idx as usize]
    }

    // -- Property getters (read-only) --

    /// Returns the local transform of a node.
    #[must_use]
    pub fn transform(&self, id: NodeId) -> &Transform {
        self.validate(id);
        &self.transform[id.idx as usize]
    }

    /// Returns whether the node itself is visible (ignoring ancestors).
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns the z-index of a node.
    #[must_use]
    pub fn z_index(&self, id: NodeId) -> i32 {
        self.validate(id);
        self.z_index[id.idx as usize]
    }

    /// Returns the node's render batch, if it is drawable.
    #[must_use]
    pub fn batch(&self, id: NodeId) -> Option<&RenderBatch> {
        self.validate(id);
        self.batch[id.idx as usize].as_ref()
    }

    /// Returns the node's touch configuration, if any.
    #[must_use]
    pub fn touchable(&self, id: NodeId) -> Option<&Touchable> {
        self.validate(id);
        self.touch[id.idx as usize].as_ref()
    }

    /// Returns the node's touch configuration mutably, if any.
    pub fn touchable_mut(&mut self, id: NodeId) -> Option<&mut Touchable> {
        self.validate(id);
        self.touch[id.idx as usize].as_mut()
    }

    /// Returns the world matrix computed by the last update.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Affine {
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    /// Returns the world color computed by the last update.
    #[must_use]
    pub fn world_color(&self, id: NodeId) -> Color {
        self.validate(id);
        self.world_color[id.idx as usize]
    }

    /// Returns the node's pending re-render flags.
    #[must_use]
    pub fn rerender_flags(&self, id: NodeId) -> ReRender {
        self.validate(id);
        self.rerender[id.idx as usize]
    }

    // -- Mutation API (records re-render flags) --

    /// Sets the position. Marks [`ReRender::VERTEX`].
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.geometry_mut(id).set_position(position);
    }

    /// Sets the rotation in radians. Marks [`ReRender::VERTEX`].
    pub fn set_rotation(&mut self, id: NodeId, radians: f64) {
        self.geometry_mut(id).set_rotation(radians);
    }

    /// Sets the scale. Marks [`ReRender::VERTEX`].
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        self.geometry_mut(id).set_scale(scale);
    }

    /// Sets the anchor. Marks [`ReRender::VERTEX`].
    pub fn set_anchor(&mut self, id: NodeId, anchor: Point) {
        self.geometry_mut(id).set_anchor(anchor);
    }

    /// Sets the size. Marks [`ReRender::VERTEX`].
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        self.geometry_mut(id).set_size(size);
    }

    /// Sets the color multiplier. Marks [`ReRender::COLOR`].
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        self.validate(id);
        let i = id.idx as usize;
        self.transform[i].set_color(color);
        self.rerender[i] |= ReRender::COLOR;
    }

    /// Shows or hides a node and its subtree.
    ///
    /// Hidden subtrees are still updated but submit no batches and collect no
    /// touch targets.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.validate(id);
        self.visible[id.idx as usize] = visible;
    }

    /// Sets the z-index. The parent re-sorts its draw order on the next update.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        self.validate(id);
        let i = id.idx as usize;
        if self.z_index[i] == z {
            return;
        }
        self.z_index[i] = z;
        if self.parent[i] != INVALID {
            self.order_stale[self.parent[i] as usize] = true;
        }
    }

    /// Binds a texture to the node's batch. Marks [`ReRender::TEXTURE`].
    ///
    /// # Panics
    ///
    /// Panics if the node has no render batch.
    pub fn set_texture(&mut self, id: NodeId, texture: Option<TextureId>) {
        self.batch_mut(id).set_texture(texture);
        self.rerender[id.idx as usize] |= ReRender::TEXTURE;
    }

    /// Replaces the batch geometry. Marks [`ReRender::VERTEX`].
    ///
    /// # Panics
    ///
    /// Panics if the node has no render batch.
    pub fn set_geometry(&mut self, id: NodeId, vertices: Vec<[f32; 2]>, indices: Vec<u16>) {
        self.batch_mut(id).set_geometry(vertices, indices);
        self.rerender[id.idx as usize] |= ReRender::VERTEX;
    }

    /// Replaces the batch texture coordinates. Marks
    /// [`ReRender::TEX_COORDS`].
    ///
    /// # Panics
    ///
    /// Panics if the node has no render batch.
    pub fn set_tex_coords(&mut self, id: NodeId, tex_coords: Vec<[f32; 2]>) {
        self.batch_mut(id).set_tex_coords(tex_coords);
        self.rerender[id.idx as usize] |= ReRender::TEX_COORDS;
    }

    /// ORs arbitrary re-render flags into a node.
    pub fn mark_rerender(&mut self, id: NodeId, flags: ReRender) {
        self.validate(id);
        self.rerender[id.idx as usize] |= flags;
    }

    /// Attaches, replaces, or removes a node's touch configuration, returning
    /// the previous one.
    pub fn set_touchable(&mut self, id: NodeId, touchable: Option<Touchable>) -> Option<Touchable> {
        self.validate(id);
        core::mem::replace(&mut self.touch[id.idx as usize], touchable)
    }

    /// Returns whether `point` (scene coordinates) hits the node.
    ///
    /// Uses the node's [`HitShape`] (bounds if it has no touch configuration)
    /// against the world matrix from the last update. A degenerate matrix hits
    /// nothing.
    #[must_use]
    pub fn contains_point(&self, id: NodeId, point: Point) -> bool {
        self.validate(id);
        let i = id.idx as usize;
        let world = self.world_transform[i];
        let det = world.determinant();
        if det == 0.0 || !det.is_finite() {
            return false;
        }
        let local = world.inverse() * point;
        let shape = self.touch[i].as_ref().map_or(HitShape::Bounds, |t| t.shape);
        shape.contains(local, self.transform[i].size())
    }

    // -- Internal helpers --

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn geometry_mut(&mut self, id: NodeId) -> &mut Transform {
        self.validate(id);
        let i = id.idx as usize;
        self.rerender[i] |= ReRender::VERTEX;
        &mut self.transform[i]
    }

    fn batch_mut(&mut self, id: NodeId) -> &mut RenderBatch {
        self.validate(id);
        match &mut self.batch[id.idx as usize] {
            Some(batch) => batch,
            None => panic!("{id:?} has no render batch"),
        }
    }

    fn is_ancestor(&self, ancestor: u32, idx: u32) -> bool {
        let mut cur = self.parent[idx as usize];
        while cur != INVALID {
            if cur == ancestor {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    /// Removes `idx` from its parent's child lists.
    fn unlink(&mut self, idx: u32) {
        let p = self.parent[idx as usize] as usize;
        self.children[p].retain(|&c| c != idx);
        self.draw_order[p].retain(|&c| c != idx);
        self.parent[idx as usize] = INVALID;
    }

    /// Frees `root` and all its descendants. `root` must already be unlinked.
    fn free_subtree(&mut self, root: u32) {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let i = idx as usize;
            stack.append(&mut self.children[i]);
            self.draw_order[i].clear();
            self.parent[i] = INVALID;
            self.batch[i] = None;
            self.touch[i] = None;
            self.alive[i] = false;
            self.generation[i] = self.generation[i].wrapping_add(1);
            self.free_list.push(idx);
        }
    }
}
