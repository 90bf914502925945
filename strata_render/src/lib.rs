// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-list recording for strata.
//!
//! This crate sits on the GPU side of
//! [`BatchSubmitter`](strata_core::batch::BatchSubmitter). It does not talk
//! to a graphics API; it records what a frame submitted, in the form a GPU
//! backend would consume:
//!
//! - [`DrawItem`]: one submitted batch with its column-major matrix, RGBA
//!   color, texture, and upload markers
//! - [`DrawList`]: the ordered items of one frame, with optional texture
//!   registration and a per-frame draw budget
//! - [`UploadCounts`]: how many re-uploads of each kind a frame required

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod list;
mod uploads;

pub use list::{DrawItem, DrawList};
pub use uploads::UploadCounts;
