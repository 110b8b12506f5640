// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pack --heading-base-level=0

//! Understory Pack: a binary bin-packing tree for texture atlases.
//!
//! [`PackTree`] places `width × height` requests onto a fixed surface without overlap
//! and gives the space back on removal.
//!
//! - Every request is grown by [`PADDING`] in each dimension so neighbouring sub-images
//!   never bleed into each other when sampled. [`Placement::slot`] is the padded region,
//!   [`Placement::draw`] the caller's pixels.
//! - A free leaf that is larger than the request is split along the axis with more
//!   slack (ties cut along x), child 0 sized to the request.
//! - [`PackTree::remove`] clears the occupant and merges sibling leaves that are both
//!   free, so long insert/remove cycles do not splinter the surface.
//! - Nodes live in an arena; freed slots are pooled and reused by later splits.
//!
//! A full surface is not an error: [`PackTree::insert`] returns `Ok(None)`. Requests
//! that could never fit return [`PackError`] without touching the tree.
//!
//! # Example
//!
//! ```rust
//! use understory_pack::{PackRect, PackTree};
//!
//! let mut atlas = PackTree::new(64, 64);
//! let label = atlas.insert(40, 12, "label").unwrap().unwrap();
//! assert_eq!(label.draw, PackRect::new(0, 0, 40, 12));
//! assert_eq!(label.slot, PackRect::new(0, 0, 41, 13));
//!
//! assert!(atlas.insert(100, 1, "too wide").is_err());
//! assert!(atlas.remove("label"));
//! assert_eq!(atlas.node_count(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod rect;
mod tree;

pub use error::PackError;
pub use rect::{Fit, PackRect};
pub use tree::{PADDING, PackTree, Placement};
