// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child iteration.

use core::slice;

use super::id::NodeId;
use super::store::NodeStore;

/// An iterator over a node's children.
///
/// Created by [`NodeStore::children`] (insertion order) and
/// [`NodeStore::draw_order`] (z-sorted order as of the last update).
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    slots: slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, slots: &'a [u32]) -> Self {
        Self {
            store,
            slots: slots.iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = *self.slots.next()?;
        Some(self.store.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        let idx = *self.slots.next_back()?;
        Some(self.store.id_at(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}
