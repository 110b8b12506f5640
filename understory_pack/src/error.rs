// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Requests the packer rejects without walking the tree.
///
/// A full atlas is not an error; [`PackTree::insert`](crate::PackTree::insert)
/// reports it as `Ok(None)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum PackError {
    /// The padded request is larger than the surface along some axis and can never be placed.
    #[error("padded request {width}x{height} exceeds the {atlas_width}x{atlas_height} atlas")]
    TooLarge {
        /// Requested width including padding.
        width: u32,
        /// Requested height including padding.
        height: u32,
        /// Surface width.
        atlas_width: u32,
        /// Surface height.
        atlas_height: u32,
    },
    /// The request has zero width or height.
    #[error("request {width}x{height} has zero area")]
    Degenerate {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}
