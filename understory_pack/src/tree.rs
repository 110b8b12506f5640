// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed binary packing tree.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::PackError;
use crate::rect::{Fit, PackRect};

/// Padding added to each requested dimension so neighbouring sub-images never bleed.
pub const PADDING: u32 = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug)]
enum Kind<O> {
    Leaf(Option<O>),
    // Child 0 is sized to the request that caused the split; child 1 is the remainder.
    Split([NodeIdx; 2]),
}

#[derive(Copy, Clone, Debug)]
struct Node<O> {
    region: PackRect,
    kind: Kind<O>,
}

/// Where a request landed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The reserved region, padding included.
    pub slot: PackRect,
    /// The caller's pixels: `slot` with the padding removed from the right and bottom.
    pub draw: PackRect,
}

/// Binary space-partition packer over one fixed-size surface.
///
/// Each leaf is either free or holds one occupant. Free leaves are split greedily
/// on insert and sibling leaves are coalesced again on remove, so repeated
/// insert/remove cycles do not fragment the surface.
pub struct PackTree<O> {
    width: u32,
    height: u32,
    padding: u32,
    nodes: Vec<Node<O>>,
    free: Vec<NodeIdx>,
    root: Option<NodeIdx>,
}

impl<O> Debug for PackTree<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PackTree")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("padding", &self.padding)
            .field("live_nodes", &self.node_count())
            .field("pooled_nodes", &self.free.len())
            .finish_non_exhaustive()
    }
}

impl<O> PackTree<O> {
    /// Surface width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Padding added to each dimension of every request.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// True once [`destroy`](Self::destroy) has released the tree.
    pub fn is_destroyed(&self) -> bool {
        self.root.is_none()
    }

    /// Number of live nodes (pooled slots excluded).
    pub fn node_count(&self) -> usize {
        if self.root.is_none() {
            0
        } else {
            self.nodes.len() - self.free.len()
        }
    }
}

impl<O: Copy + PartialEq> PackTree<O> {
    /// Create an empty packer over a `width × height` surface with the default [`PADDING`].
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_padding(width, height, PADDING)
    }

    /// Create an empty packer with explicit padding.
    pub fn with_padding(width: u32, height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            padding,
            nodes: vec![Node {
                region: PackRect::new(0, 0, width, height),
                kind: Kind::Leaf(None),
            }],
            free: Vec::new(),
            root: Some(NodeIdx::new(0)),
        }
    }

    /// Place a `width × height` request for `occupant`.
    ///
    /// Returns `Ok(None)` when no free region is large enough, which is the normal
    /// "atlas full" outcome (and the outcome after [`destroy`](Self::destroy)).
    /// Requests that can never fit are rejected before the tree is walked.
    pub fn insert(
        &mut self,
        width: u32,
        height: u32,
        occupant: O,
    ) -> Result<Option<Placement>, PackError> {
        if width == 0 || height == 0 {
            return Err(PackError::Degenerate { width, height });
        }
        let padded_w = width.saturating_add(self.padding);
        let padded_h = height.saturating_add(self.padding);
        if padded_w > self.width || padded_h > self.height {
            return Err(PackError::TooLarge {
                width: padded_w,
                height: padded_h,
                atlas_width: self.width,
                atlas_height: self.height,
            });
        }
        let Some(root) = self.root else {
            return Ok(None);
        };
        let placed = self.insert_at(root, padded_w, padded_h, occupant);
        Ok(placed.map(|idx| {
            let slot = self.nodes[idx.get()].region;
            Placement {
                slot,
                draw: PackRect::new(slot.x, slot.y, width, height),
            }
        }))
    }

    fn insert_at(
        &mut self,
        idx: NodeIdx,
        width: u32,
        height: u32,
        occupant: O,
    ) -> Option<NodeIdx> {
        let Node { region, kind } = self.nodes[idx.get()];
        match kind {
            Kind::Split([first, second]) => self
                .insert_at(first, width, height, occupant)
                .or_else(|| self.insert_at(second, width, height, occupant)),
            Kind::Leaf(Some(_)) => None,
            Kind::Leaf(None) => match region.fit(width, height) {
                Fit::TooSmall => None,
                Fit::Exact => {
                    self.nodes[idx.get()].kind = Kind::Leaf(Some(occupant));
                    Some(idx)
                }
                Fit::Slack => {
                    let first = self.split(idx, width, height);
                    self.insert_at(first, width, height, occupant)
                }
            },
        }
    }

    /// Split the free leaf at `idx` along the axis with more slack; ties cut along x.
    fn split(&mut self, idx: NodeIdx, width: u32, height: u32) -> NodeIdx {
        let r = self.nodes[idx.get()].region;
        let dw = r.width - width;
        let dh = r.height - height;
        let (a, b) = if dw >= dh {
            (
                PackRect::new(r.x, r.y, width, r.height),
                PackRect::new(r.x + width, r.y, dw, r.height),
            )
        } else {
            (
                PackRect::new(r.x, r.y, r.width, height),
                PackRect::new(r.x, r.y + height, r.width, dh),
            )
        };
        let first = self.alloc(a);
        let second = self.alloc(b);
        self.nodes[idx.get()].kind = Kind::Split([first, second]);
        first
    }

    fn alloc(&mut self, region: PackRect) -> NodeIdx {
        let node = Node {
            region,
            kind: Kind::Leaf(None),
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.get()] = node;
            idx
        } else {
            self.nodes.push(node);
            NodeIdx::new(self.nodes.len() - 1)
        }
    }

    fn is_free_leaf(&self, idx: NodeIdx) -> bool {
        matches!(self.nodes[idx.get()].kind, Kind::Leaf(None))
    }

    /// Release the slot held by `occupant`.
    ///
    /// Sibling leaves that both end up free are merged back into their parent.
    /// Returns `false` if `occupant` was not placed.
    pub fn remove(&mut self, occupant: O) -> bool {
        match self.root {
            Some(root) => self.remove_at(root, occupant),
            None => false,
        }
    }

    fn remove_at(&mut self, idx: NodeIdx, occupant: O) -> bool {
        let kind = self.nodes[idx.get()].kind;
        match kind {
            Kind::Leaf(Some(o)) if o == occupant => {
                self.nodes[idx.get()].kind = Kind::Leaf(None);
                true
            }
            Kind::Leaf(_) => false,
            Kind::Split([first, second]) => {
                let removed = self.remove_at(first, occupant) || self.remove_at(second, occupant);
                if removed && self.is_free_leaf(first) && self.is_free_leaf(second) {
                    self.free.extend([first, second]);
                    self.nodes[idx.get()].kind = Kind::Leaf(None);
                }
                removed
            }
        }
    }

    /// Release every node. Further inserts report a full tree until [`reset`](Self::reset).
    ///
    /// Calling this more than once has no further effect.
    pub fn destroy(&mut self) {
        if self.root.take().is_some() {
            tracing::debug!(width = self.width, height = self.height, "pack tree destroyed");
        }
        self.nodes.clear();
        self.free.clear();
    }

    /// Drop every placement and start again from one free root, reusing the arena allocation.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(Node {
            region: PackRect::new(0, 0, self.width, self.height),
            kind: Kind::Leaf(None),
        });
        self.root = Some(NodeIdx::new(0));
    }

    /// Every placed occupant with its padded slot, in tree order.
    pub fn occupants(&self) -> impl Iterator<Item = (O, PackRect)> + '_ {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIdx> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx.get()];
            match node.kind {
                Kind::Leaf(Some(o)) => out.push((o, node.region)),
                Kind::Leaf(None) => {}
                Kind::Split([first, second]) => stack.extend([second, first]),
            }
        }
        out.into_iter()
    }

    /// Placement currently held by `occupant`, if any.
    pub fn find(&self, occupant: O) -> Option<PackRect> {
        self.occupants()
            .find_map(|(o, slot)| (o == occupant).then_some(slot))
    }

    /// Total padded area of all placed slots.
    pub fn used_area(&self) -> u64 {
        self.occupants().map(|(_, slot)| slot.area()).sum()
    }
}
