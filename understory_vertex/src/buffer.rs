// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistent attribute arrays and the bookkeeping around them.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::attribute::{AttributeSpec, MAX_VERTEX_SLOTS, layout_width};

/// Window of vertices the host should draw.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawRange {
    /// First vertex.
    pub start: usize,
    /// Number of vertices.
    pub count: usize,
}

impl DrawRange {
    /// Nothing to draw.
    pub const EMPTY: Self = Self { start: 0, count: 0 };

    /// Draw the first `count` vertices.
    pub const fn prefix(count: usize) -> Self {
        Self { start: 0, count }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct AttributeArray {
    pub(crate) spec: AttributeSpec,
    pub(crate) data: Vec<f32>,
}

/// Flat attribute arrays for up to [`vertex_capacity`](Self::vertex_capacity) vertices,
/// plus the identity of the shape list last written into them.
///
/// Arrays never shrink. When a write needs more room than they hold, they are replaced
/// by larger ones and [`epoch`](Self::epoch) advances, telling the host to re-upload
/// whole buffers instead of sub-ranges.
pub struct BufferItems<T> {
    pub(crate) attributes: Vec<AttributeArray>,
    pub(crate) current_data: Option<Rc<[T]>>,
    pub(crate) draw_range: DrawRange,
    pub(crate) vertex_capacity: usize,
    pub(crate) epoch: u64,
}

impl<T> Debug for BufferItems<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferItems")
            .field(
                "attributes",
                &self.attributes.iter().map(|a| a.spec.name).collect::<Vec<_>>(),
            )
            .field("vertex_capacity", &self.vertex_capacity)
            .field("draw_range", &self.draw_range)
            .field("epoch", &self.epoch)
            .field("has_data", &self.current_data.is_some())
            .finish_non_exhaustive()
    }
}

/// Allocate one array per attribute for `vertex_count` vertices, every vertex set to the
/// attribute's defaults.
///
/// Layouts wider than [`MAX_VERTEX_SLOTS`] floats per vertex are logged but still built.
pub fn make_buffer<T>(vertex_count: usize, specs: &[AttributeSpec]) -> BufferItems<T> {
    let width = layout_width(specs);
    if width > MAX_VERTEX_SLOTS {
        tracing::warn!(
            width,
            max = MAX_VERTEX_SLOTS,
            "vertex layout exceeds the portable attribute limit"
        );
    }
    BufferItems {
        attributes: specs
            .iter()
            .map(|spec| AttributeArray {
                spec: *spec,
                data: spec.default_vertex().repeat(vertex_count),
            })
            .collect(),
        current_data: None,
        draw_range: DrawRange::EMPTY,
        vertex_capacity: vertex_count,
        epoch: 0,
    }
}

impl<T> BufferItems<T> {
    /// Array for the attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&[f32]> {
        self.attributes
            .iter()
            .find(|a| a.spec.name == name)
            .map(|a| a.data.as_slice())
    }

    /// Every attribute with its array, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&AttributeSpec, &[f32])> + '_ {
        self.attributes.iter().map(|a| (&a.spec, a.data.as_slice()))
    }

    /// Vertices the host should draw.
    pub fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    /// Vertices the arrays can hold.
    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    /// Incremented each time the arrays are replaced by larger ones.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Shape list last written, compared by identity.
    pub fn current_data(&self) -> Option<&Rc<[T]>> {
        self.current_data.as_ref()
    }

    /// Replace the arrays with ones holding `vertex_count` vertices.
    ///
    /// The first `keep` vertices are carried over; the rest start at their defaults.
    pub(crate) fn regrow(&mut self, vertex_count: usize, keep: usize) {
        let keep = keep.min(self.vertex_capacity);
        for array in &mut self.attributes {
            let n = array.spec.size.components();
            let mut data = Vec::with_capacity(vertex_count * n);
            data.extend_from_slice(&array.data[..keep * n]);
            for _ in keep..vertex_count {
                data.extend_from_slice(array.spec.default_vertex());
            }
            array.data = data;
        }
        tracing::debug!(
            from = self.vertex_capacity,
            to = vertex_count,
            epoch = self.epoch + 1,
            "vertex buffer replaced"
        );
        self.vertex_capacity = vertex_count;
        self.epoch += 1;
    }
}
