// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quad-tree basics.
//!
//! Scatter a mix of rectangles, circles, and curves, cull them against a viewport,
//! and pick the shape under the cursor.
//!
//! Run:
//! - `cargo run -p understory_demos --example quadtree_visible`

use kurbo::{Circle, CubicBez, Point};
use understory_quadtree::QuadTree;
use understory_shape::{Bounds, Curve, Shape};

fn main() {
    let mut tree = QuadTree::new();
    for i in 0..20 {
        let x = f64::from(i) * 25.0;
        let _ = tree.add(Shape::Rect(Bounds::new(x, 20.0, 20.0, 20.0)));
        let _ = tree.add(Shape::Circle(Circle::new((x + 10.0, 60.0), 8.0)));
    }
    let wave = tree.add(Shape::Curve(Curve::new(
        CubicBez::new((0.0, 100.0), (150.0, 160.0), (350.0, 40.0), (500.0, 100.0)),
        4.0,
    )));

    println!(
        "{} shapes in {} nodes, depth {}",
        tree.len(),
        tree.node_count(),
        tree.depth()
    );
    if let Some(root) = tree.bounds() {
        println!("root bounds: {root:?}");
    }

    // Only what the viewport overlaps gets drawn.
    let viewport = Bounds::new(90.0, 70.0, 110.0, 60.0);
    let mut visited = 0;
    let visible: Vec<_> = tree
        .query_with(&viewport, |_| visited += 1)
        .map(|(id, _)| id)
        .collect();
    println!("{} visible after visiting {visited} nodes", visible.len());
    assert!(visible.contains(&wave), "the curve crosses the viewport");

    // Picking prefers the most recently added shape.
    let cursor = Point::new(112.0, 60.0);
    match tree.hit_test_point(cursor) {
        Some((id, shape)) => println!("picked {id:?}: {shape:?}"),
        None => println!("nothing under {cursor:?}"),
    }
}
