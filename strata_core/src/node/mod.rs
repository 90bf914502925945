// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph data model.
//!
//! A *node* is an element of the retained scene tree. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that goes stale when
//!   the node is destroyed.
//! - Topology: a parent link and an ordered child list. Only container nodes
//!   (groups) accept children.
//! - **Local properties** set by the caller through the [`NodeStore`]
//!   setters: the [`Transform`](crate::transform::Transform) fields, color,
//!   visibility, z-index, render batch contents, and touch configuration.
//! - **Computed properties** written by [`update`](NodeStore::update):
//!   world matrix (`parent_world * local`) and world color
//!   (`parent_world_color * color`).
//!
//! Every setter records what it invalidated in the node's
//! [`ReRender`](crate::dirty::ReRender) flags, so an unchanged subtree costs a
//! visit and nothing more.
//!
//! # Draw order
//!
//! Children are drawn in ascending z-index; ties keep insertion order. The
//! sorted order is cached per container and rebuilt lazily by the update pass
//! after a child is added, removed, or changes z-index.

mod id;
mod store;
mod traverse;
mod update;

pub use id::{INVALID, NodeId};
pub use store::NodeStore;
pub use traverse::Children;
pub use update::{DrawStats, UpdateStats};
