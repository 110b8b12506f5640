// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_vertex --heading-base-level=0

//! Understory Vertex: keep flat GPU attribute arrays in sync with a list of shapes.
//!
//! - [`make_buffer`] allocates one `f32` array per [`AttributeSpec`] and fills every
//!   vertex with the attribute's defaults.
//! - [`BufferReconciler::update_buffer`] writes a shape list into those arrays through a
//!   caller-supplied writer, one call per shape, and keeps the [`DrawRange`] current.
//!
//! Change detection is by list identity, not contents: lists are shared as `Rc<[T]>` and
//! a list that is pointer-equal to the one last written is skipped unless the call is
//! forced. Mutating shapes in place without building a new list is therefore not seen.
//!
//! Arrays are reused while the shape count fits. A shorter list only narrows the draw
//! range; an empty list hides the buffer. A list too large for the arrays replaces them
//! with larger ones and bumps [`BufferItems::epoch`].
//!
//! Several shape categories can share one buffer: between
//! [`begin_updates`](BufferReconciler::begin_updates) and
//! [`end_updates`](BufferReconciler::end_updates) each call continues where the previous
//! one stopped, and `end_updates` returns the total vertex count.
//!
//! [`FrameClock`] and [`SurfaceClocks`] carry per-surface frame counters and timestamps
//! for whatever needs "now" during an update.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_vertex::{
//!     AttributeSize, AttributeSpec, BufferReconciler, DrawRange, make_buffer,
//! };
//!
//! // Two triangles per quad, one position and one color per vertex.
//! let layout = [
//!     AttributeSpec::new("position", AttributeSize::Two),
//!     AttributeSpec::new("color", AttributeSize::Four).with_defaults([1.0; 4]),
//! ];
//! let mut buffer = make_buffer(6 * 16, &layout);
//! let mut reconciler = BufferReconciler::new();
//!
//! let quads: Rc<[[f32; 2]]> = Rc::from(vec![[0.0, 0.0], [10.0, 0.0]]);
//! let written = reconciler.update_buffer(&quads, &mut buffer, 6, quads.len(), false, |_, quad, slots| {
//!     for v in 0..6 {
//!         slots[0].set(v, quad);
//!     }
//! });
//! assert!(written);
//! assert_eq!(buffer.draw_range(), DrawRange { start: 0, count: 12 });
//! assert_eq!(&buffer.attribute("position").unwrap()[12..14], &[10.0, 0.0]);
//!
//! // Same list again: nothing to do.
//! assert!(!reconciler.update_buffer(&quads, &mut buffer, 6, quads.len(), false, |_, _, _| {}));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attribute;
mod buffer;
mod clock;
mod reconciler;

pub use attribute::{AttributeSize, AttributeSpec, MAX_VERTEX_SLOTS, layout_width};
pub use buffer::{BufferItems, DrawRange, make_buffer};
pub use clock::{FrameClock, FrameTick, SurfaceClocks, SurfaceId};
pub use reconciler::{AttributeSlot, BufferReconciler};
