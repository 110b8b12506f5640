// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_shape --heading-base-level=0

//! Understory Shape: world-space bounds and drawable shape variants.
//!
//! - [`Bounds`]: an axis-aligned box anchored at its top-left corner, where `y` is the
//!   top edge and the box extends down to `y - height`.
//! - [`Shape`]: a tagged union over rectangles, circles, and stroked cubic curves.
//! - [`Bounded`]: the small capability every indexable item shares
//!   (`bounding_box`, `contains_point`, `distance_to`).
//!
//! Curves and circles use Kurbo for the heavy lifting (extrema, nearest point).
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Circle, Point};
//! use understory_shape::{Bounded, Bounds, Shape};
//!
//! let node = Shape::from(Circle::new((0.0, 0.0), 2.0));
//! assert_eq!(node.bounding_box(), Bounds::new(-2.0, 2.0, 4.0, 4.0));
//! assert!(node.contains_point(Point::new(1.0, 1.0)));
//! assert_eq!(node.distance_to(Point::new(5.0, 0.0)), 3.0);
//! ```
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

mod bounds;
mod shape;

pub use bounds::Bounds;
pub use shape::{Bounded, Curve, Shape};
