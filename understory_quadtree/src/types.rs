// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles and tuning knobs for the quad-tree.

/// Stable handle of an item added to a [`QuadTree`](crate::QuadTree).
///
/// Handles are dense and assigned in insertion order; they stay valid across
/// splits and bounds growth and are only invalidated by [`QuadTree::clear`](crate::QuadTree::clear).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Item handles are 32-bit; datasets beyond u32::MAX items are unsupported."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// Position of the item in insertion order.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const ROOT: Self = Self(0);

    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// Split and growth parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadTreeConfig {
    /// A node splits once it holds more than this many items of its own.
    pub max_items: usize,
    /// Nodes at this depth never split.
    pub max_depth: u8,
    /// Padding added on every side when the root grows.
    pub cover_margin: f64,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_items: 5,
            max_depth: 10,
            cover_margin: 1.0,
        }
    }
}
