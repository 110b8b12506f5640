// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Streaming vertex updates.
//!
//! Write two shape categories into one shared buffer per frame, skip unchanged
//! lists, and watch the buffer grow when a category gets bigger.
//!
//! Run:
//! - `cargo run -p understory_demos --example vertex_streaming`

use std::rc::Rc;

use understory_vertex::{
    AttributeSize, AttributeSpec, BufferReconciler, SurfaceClocks, SurfaceId, make_buffer,
};

const LAYOUT: [AttributeSpec; 2] = [
    AttributeSpec::new("position", AttributeSize::Two),
    AttributeSpec::new("color", AttributeSize::Four).with_defaults([0.0, 0.0, 0.0, 1.0]),
];

/// Corner and colour of a point sprite drawn as one vertex.
type Dot = ([f32; 2], [f32; 4]);

fn dots(count: usize, color: [f32; 4]) -> Rc<[Dot]> {
    (0..count)
        .map(|i| ([i as f32 * 4.0, 0.0], color))
        .collect()
}

fn main() {
    let mut buffer = make_buffer::<Dot>(8, &LAYOUT);
    let mut reconciler = BufferReconciler::new();
    let mut clocks = SurfaceClocks::new();
    let surface = SurfaceId(1);

    let red = dots(3, [1.0, 0.0, 0.0, 1.0]);
    let blue = dots(2, [0.0, 0.0, 1.0, 1.0]);
    let more_blue = dots(9, [0.0, 0.0, 1.0, 1.0]);

    for (now, second) in [(0.0, &blue), (16.0, &blue), (33.0, &more_blue)] {
        let tick = clocks.tick(surface, now);
        reconciler.begin_updates();
        for list in [&red, second] {
            let _ = reconciler.update_buffer(list, &mut buffer, 1, list.len(), false, |_, dot, slots| {
                slots[0].set(0, &dot.0);
                slots[1].set(0, &dot.1);
            });
        }
        let total = reconciler.end_updates();
        assert_eq!(total, red.len() + second.len(), "categories land back to back");
        assert_eq!(buffer.draw_range().count, total);
        println!(
            "frame {} (+{} ms): {total} vertices, draw {:?}, capacity {}, epoch {}",
            tick.frame,
            tick.delta_ms,
            buffer.draw_range(),
            buffer.vertex_capacity(),
            buffer.epoch()
        );
    }

    // Outside a streaming pass an unchanged list is skipped.
    let mut single = BufferReconciler::new();
    let wrote = single.update_buffer(&red, &mut buffer, 1, red.len(), false, |_, _, _| {});
    let again = single.update_buffer(&red, &mut buffer, 1, red.len(), false, |_, _, _| {});
    println!("first write: {wrote}, repeat write: {again}");
    assert!(wrote && !again, "an unchanged list is written once");
    assert_eq!(buffer.epoch(), 1, "only the 12-vertex frame outgrew the buffer");
}
