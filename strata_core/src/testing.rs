// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared test doubles.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Affine;

use crate::batch::{BatchSubmitter, DrawCall};
use crate::color::Color;
use crate::dirty::ReRender;
use crate::error::SubmitError;
use crate::node::NodeId;
use crate::touch::{Touch, TouchContext, TouchListener, TouchPhase};

/// A submission as seen by [`RecordingSubmitter`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RecordedCall {
    pub(crate) node: NodeId,
    pub(crate) matrix: Affine,
    pub(crate) color: Color,
    pub(crate) uploads: ReRender,
}

/// Records every submission; optionally fails after a number of successes.
#[derive(Debug, Default)]
pub(crate) struct RecordingSubmitter {
    pub(crate) calls: Vec<RecordedCall>,
    pub(crate) clears: Vec<Color>,
    fail_after: Option<usize>,
}

impl RecordingSubmitter {
    pub(crate) fn failing_after(successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::default()
        }
    }

    pub(crate) fn nodes(&self) -> Vec<NodeId> {
        self.calls.iter().map(|c| c.node).collect()
    }
}

impl BatchSubmitter for RecordingSubmitter {
    fn begin_frame(&mut self, clear_color: Color) {
        self.clears.push(clear_color);
    }

    fn submit(&mut self, call: &DrawCall<'_>) -> Result<(), SubmitError> {
        if self.fail_after.is_some_and(|n| self.calls.len() >= n) {
            return Err(SubmitError::ResourceExhausted);
        }
        self.calls.push(RecordedCall {
            node: call.node,
            matrix: call.matrix,
            color: call.color,
            uploads: call.uploads,
        });
        Ok(())
    }
}

/// One listener invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Heard {
    Begin {
        node: NodeId,
        id: u32,
        phase: TouchPhase,
    },
    Move {
        node: NodeId,
        id: u32,
        contains: bool,
    },
    End {
        node: NodeId,
        id: u32,
        contains: bool,
    },
}

pub(crate) type Log = Rc<RefCell<Vec<Heard>>>;

/// A listener that appends to a shared log.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingListener {
    pub(crate) log: Log,
    pub(crate) reject: bool,
}

impl RecordingListener {
    pub(crate) fn shared(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            reject: false,
        }
    }
}

impl TouchListener for RecordingListener {
    fn touch_begin(&mut self, touch: &Touch, cx: &TouchContext) -> bool {
        self.log.borrow_mut().push(Heard::Begin {
            node: cx.node,
            id: touch.id,
            phase: touch.phase,
        });
        !self.reject
    }

    fn touch_move(&mut self, touch: &Touch, cx: &TouchContext) {
        self.log.borrow_mut().push(Heard::Move {
            node: cx.node,
            id: touch.id,
            contains: cx.contains,
        });
    }

    fn touch_end(&mut self, touch: &Touch, cx: &TouchContext) {
        self.log.borrow_mut().push(Heard::End {
            node: cx.node,
            id: touch.id,
            contains: cx.contains,
        });
    }
}
