// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;
use understory_pack::PackError;

/// Reasons the color grid of a build could not be reserved.
///
/// Reported through [`AtlasReport::color_error`](crate::AtlasReport::color_error); the
/// rest of the build still commits. Per-image problems (load failure, no room) never
/// surface here; those images get
/// [`ImagePlacement::DEFAULT`](crate::ImagePlacement::DEFAULT) instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum AtlasError {
    /// The color grid cannot fit on the surface.
    #[error("{colors} colors exceed the color grid capacity of {capacity} cells")]
    ColorCapacity {
        /// Number of colors requested.
        colors: usize,
        /// Most cells the surface can hold.
        capacity: usize,
    },
    /// The packer rejected a structural reservation.
    #[error("atlas reservation rejected: {0}")]
    Pack(#[from] PackError),
}
