// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a region quad-tree over [`Bounded`](understory_shape::Bounded) items.
//!
//! The tree answers two questions quickly for large scenes: "what overlaps this box?"
//! (visible-set culling) and "what is under this point?" (picking).
//!
//! - Items are added once and addressed by a dense [`ItemId`].
//! - A node splits into four quadrants (top-left, top-right, bottom-left, bottom-right)
//!   once it holds more than [`QuadTreeConfig::max_items`] items and is shallower than
//!   [`QuadTreeConfig::max_depth`].
//! - An item that does not fit entirely inside one quadrant stays at the deepest node
//!   that contains it.
//! - Adding an item outside the root grows the root to the union of old and new bounds
//!   plus [`QuadTreeConfig::cover_margin`], then re-adds everything. Bounds never shrink.
//! - Items with zero area or non-finite bounds are logged through `tracing`, kept at the
//!   root, and never split.
//!
//! Queries run eagerly and return iterators over `(ItemId, &item)` pairs. The `_with`
//! variants accept a visitor that sees every node the search enters.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_quadtree::QuadTree;
//! use understory_shape::Bounds;
//!
//! let mut tree = QuadTree::new();
//! let a = tree.add(Bounds::new(0.0, 10.0, 10.0, 10.0));
//! let _b = tree.add(Bounds::new(100.0, 10.0, 10.0, 10.0));
//!
//! let hits: Vec<_> = tree.query(&Bounds::new(-5.0, 20.0, 20.0, 20.0)).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].0, a);
//!
//! assert_eq!(tree.query_point(Point::new(105.0, 5.0)).count(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{NodeRef, QuadTree};
pub use types::{ItemId, QuadTreeConfig};
