// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing shape lists into [`BufferItems`].

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::buffer::{BufferItems, DrawRange};

/// One attribute's array positioned at the shape being written.
///
/// Vertex indices passed to [`set`](Self::set) are relative to the shape, so a writer
/// never needs to know where in the buffer its shape lands.
#[derive(Debug)]
pub struct AttributeSlot<'a> {
    data: &'a mut [f32],
    offset: usize,
    components: usize,
    vertices: usize,
}

impl AttributeSlot<'_> {
    /// Index of this shape's first float in the attribute array.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Floats per vertex.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Write one vertex of this shape.
    ///
    /// # Panics
    ///
    /// If `values` is wider than the attribute, or the write lands past the end of the
    /// array.
    pub fn set(&mut self, vertex: usize, values: &[f32]) {
        assert!(
            values.len() <= self.components,
            "{} values for a {}-component attribute",
            values.len(),
            self.components
        );
        let at = self.offset + vertex * self.components;
        assert!(
            at + values.len() <= self.data.len(),
            "attribute write at {at} past the end of a {}-float array",
            self.data.len()
        );
        self.data[at..at + values.len()].copy_from_slice(values);
    }

    /// Write the same value to every vertex of this shape.
    pub fn fill(&mut self, values: &[f32]) {
        for v in 0..self.vertices {
            self.set(v, values);
        }
    }

    /// This shape's floats for the attribute, all vertices back to back.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        let len = self.vertices * self.components;
        &mut self.data[self.offset..self.offset + len]
    }
}

/// Decides when a shape list must be written and where its vertices go.
///
/// Outside a streaming bracket every write starts at vertex zero and is skipped when
/// the same list (by [`Rc`] identity) was already written. Inside
/// [`begin_updates`](Self::begin_updates) / [`end_updates`](Self::end_updates) every
/// call writes, each starting where the previous one stopped.
#[derive(Clone, Debug, Default)]
pub struct BufferReconciler {
    streaming: bool,
    cursor: usize,
}

impl BufferReconciler {
    /// A reconciler outside any streaming bracket.
    pub fn new() -> Self {
        Self::default()
    }

    /// True between [`begin_updates`](Self::begin_updates) and
    /// [`end_updates`](Self::end_updates).
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Vertex where the next streamed write starts.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Enter streaming mode with the cursor at vertex zero.
    pub fn begin_updates(&mut self) {
        self.streaming = true;
        self.cursor = 0;
    }

    /// Leave streaming mode and return the number of vertices written in the bracket.
    pub fn end_updates(&mut self) -> usize {
        let total = self.cursor;
        self.streaming = false;
        self.cursor = 0;
        total
    }

    /// Write the first `shape_count` shapes of `shapes` into `buffer`.
    ///
    /// `write(i, shape, slots)` is called once per shape, in order, with one
    /// [`AttributeSlot`] per attribute in declaration order. Each slot is positioned at
    /// `components * vertex` where `vertex` is the shape's first global vertex.
    ///
    /// Returns `false` if the write was skipped because `shapes` is the list already
    /// written and neither `force` nor streaming mode is set. An empty list hides
    /// the buffer by setting an empty draw range without touching the arrays. If the
    /// shapes need more vertices than the buffer holds, the arrays are replaced by
    /// larger ones first (see [`BufferItems::epoch`]).
    pub fn update_buffer<T, F>(
        &mut self,
        shapes: &Rc<[T]>,
        buffer: &mut BufferItems<T>,
        vertices_per_shape: usize,
        shape_count: usize,
        force: bool,
        mut write: F,
    ) -> bool
    where
        F: FnMut(usize, &T, &mut [AttributeSlot<'_>]),
    {
        let unchanged = buffer
            .current_data
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, shapes));
        if unchanged && !force && !self.streaming {
            tracing::trace!(shapes = shapes.len(), "same shape list; write skipped");
            return false;
        }
        buffer.current_data = Some(Rc::clone(shapes));

        let count = shape_count.min(shapes.len());
        let start = if self.streaming { self.cursor } else { 0 };
        if count == 0 {
            if !self.streaming {
                buffer.draw_range = DrawRange::EMPTY;
            }
            tracing::trace!(start, "empty shape list");
            return true;
        }

        let end = start + count * vertices_per_shape;
        if end > buffer.vertex_capacity {
            buffer.regrow(end, start);
        }

        let mut slots: Vec<AttributeSlot<'_>> = buffer
            .attributes
            .iter_mut()
            .map(|array| AttributeSlot {
                components: array.spec.size.components(),
                data: &mut array.data,
                offset: 0,
                vertices: vertices_per_shape,
            })
            .collect();
        for (i, shape) in shapes.iter().take(count).enumerate() {
            let vertex = start + i * vertices_per_shape;
            for slot in &mut slots {
                slot.offset = slot.components * vertex;
            }
            write(i, shape, &mut slots);
        }

        buffer.draw_range = DrawRange::prefix(end);
        if self.streaming {
            self.cursor = end;
        }
        tracing::trace!(
            written = count,
            start,
            end,
            streaming = self.streaming,
            "shapes written"
        );
        true
    }
}
