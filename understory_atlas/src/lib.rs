// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_atlas --heading-base-level=0

//! Understory Atlas: named texture atlases for labels, bitmaps, and flat colors.
//!
//! An [`AtlasCoordinator`] owns one [`PackTree`](understory_pack::PackTree) and one
//! RGBA8 [`AtlasSurface`] per atlas name ("labels", "colors", ...). Building an atlas
//! always starts from scratch:
//!
//! 1. [`begin`](AtlasCoordinator::begin) tears down the previous atlas of that name and
//!    issues an [`AtlasTicket`] for the next [`Generation`].
//! 2. Every image is handed to a [`Rasterizer`]; all rasterizations run concurrently.
//! 3. [`commit`](AtlasCoordinator::commit) places colors and images sequentially,
//!    but only if the ticket is still current. A build overtaken by a newer build or
//!    by [`destroy_atlas`](AtlasCoordinator::destroy_atlas) is discarded.
//!
//! [`AtlasCoordinator::create_atlas`] runs all three steps as one future.
//!
//! Images that fail to load or do not fit get [`ImagePlacement::DEFAULT`] rather than
//! failing the batch. Colors share a grid of small square cells reserved as a single
//! placement; each [`ColorPlacement`] also records the grid addressing a shader needs
//! to find a cell from its index alone. A grid that cannot fit is skipped, logged,
//! and reported as an [`AtlasError`] in the [`AtlasReport`]; the images still land.
//!
//! Placements are recorded against caller-chosen [`HandleKey`]s in tables owned by the
//! coordinator. Destroying an atlas removes every placement it owns.
//!
//! # Example
//!
//! ```rust
//! use core::cell::RefCell;
//! use futures_util::FutureExt;
//! use understory_atlas::{
//!     AtlasConfig, AtlasCoordinator, CommitOutcome, HandleKey, ImageHandle, ImageSource,
//!     Raster, RasterFuture, Rasterizer,
//! };
//!
//! struct Boxes;
//!
//! impl Rasterizer for Boxes {
//!     fn rasterize<'a>(&'a self, source: &'a ImageSource) -> RasterFuture<'a> {
//!         let raster = match source {
//!             ImageSource::Label { text, font_size } => {
//!                 let h = *font_size as u32;
//!                 Some(Raster::solid(h * text.len() as u32 / 2, h, [255; 4]))
//!             }
//!             ImageSource::Bitmap { .. } => None,
//!         };
//!         core::future::ready(raster).boxed_local()
//!     }
//! }
//!
//! let coord = RefCell::new(AtlasCoordinator::new(AtlasConfig {
//!     width: 256,
//!     height: 256,
//!     color_cell: 2,
//! }));
//! let labels = [
//!     ImageHandle::label(HandleKey(1), "hello", 16.0),
//!     ImageHandle::bitmap(HandleKey(2), "missing.png"),
//! ];
//! let outcome = pollster::block_on(AtlasCoordinator::create_atlas(
//!     &coord, "labels", &labels, &[], &Boxes,
//! ));
//! assert!(matches!(outcome, CommitOutcome::Committed(r) if r.placed == 1));
//!
//! let coord = coord.borrow();
//! assert_eq!(coord.image(HandleKey(1)).unwrap().pixel_width, 40);
//! assert!(coord.image(HandleKey(2)).unwrap().is_default());
//! assert!(coord.is_ready("labels"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod color;
mod coordinator;
mod error;
mod raster;
mod types;

pub use coordinator::{AtlasCoordinator, AtlasReport, AtlasTicket, CommitOutcome};
pub use error::AtlasError;
pub use raster::{AtlasSurface, Raster, RasterFuture, Rasterizer};
pub use types::{
    AtlasConfig, AtlasId, AtlasReady, ColorHandle, ColorPlacement, Generation, HandleKey,
    ImageHandle, ImagePlacement, ImageSource, UvRect,
};
