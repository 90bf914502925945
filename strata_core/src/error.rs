// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable frame errors.
//!
//! Misuse of the node API (stale handles, attaching a node twice, cycles) is a
//! programmer error and panics. Failures that originate outside the engine,
//! such as a backend rejecting a batch, surface as values of these types.

use alloc::string::String;

use crate::node::NodeId;

/// A backend failure while submitting one batch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The backend ran out of buffer or texture space.
    #[error("GPU resources exhausted")]
    ResourceExhausted,
    /// The batch references a texture the backend does not know.
    #[error("unknown texture {0}")]
    UnknownTexture(u32),
    /// Any other backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// A failure that aborted a frame.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The draw pass stopped because a submission failed.
    #[error("draw submission failed for {node:?}")]
    Submit {
        /// The node whose batch was rejected.
        node: NodeId,
        /// The backend's error.
        #[source]
        source: SubmitError,
    },
}
