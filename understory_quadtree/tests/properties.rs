// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests: the tree must agree with a linear scan and never lose items.

use kurbo::Point;
use proptest::prelude::*;
use understory_quadtree::{ItemId, QuadTree, QuadTreeConfig};
use understory_shape::Bounds;

fn bounds_strategy() -> impl Strategy<Value = Bounds> {
    (-500.0..500.0f64, -500.0..500.0f64, 0.5..80.0f64, 0.5..80.0f64)
        .prop_map(|(x, y, w, h)| Bounds::new(x, y, w, h))
}

fn build(items: &[Bounds], max_items: usize) -> (QuadTree<Bounds>, Vec<ItemId>) {
    let mut tree = QuadTree::with_config(QuadTreeConfig {
        max_items,
        ..QuadTreeConfig::default()
    });
    let ids = items.iter().map(|b| tree.add(*b)).collect();
    (tree, ids)
}

fn sorted(mut ids: Vec<ItemId>) -> Vec<ItemId> {
    ids.sort_unstable();
    ids
}

proptest! {
    #[test]
    fn query_matches_linear_scan(
        items in prop::collection::vec(bounds_strategy(), 0..120),
        area in bounds_strategy(),
        max_items in 1usize..8,
    ) {
        let (tree, ids) = build(&items, max_items);
        let expected: Vec<_> = items
            .iter()
            .zip(ids)
            .filter(|(b, _)| b.intersects(&area))
            .map(|(_, id)| id)
            .collect();
        let got = sorted(tree.query(&area).map(|(id, _)| id).collect());
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn point_query_matches_linear_scan(
        items in prop::collection::vec(bounds_strategy(), 0..120),
        x in -550.0..550.0f64,
        y in -550.0..550.0f64,
    ) {
        let (tree, _) = build(&items, 5);
        let p = Point::new(x, y);
        let expected = items.iter().filter(|b| b.contains_point(p)).count();
        prop_assert_eq!(tree.query_point(p).count(), expected);
    }

    #[test]
    fn every_item_is_inside_root_and_reachable(
        items in prop::collection::vec(bounds_strategy(), 1..80),
    ) {
        let (tree, _) = build(&items, 3);
        let root = tree.bounds().unwrap();
        let mut seen = Vec::new();
        tree.visit(|node| {
            for (id, b) in node.items() {
                assert!(b.is_inside(&node.bounds()), "item outside its node");
                seen.push(id);
            }
            false
        });
        for b in &items {
            prop_assert!(b.is_inside(&root));
        }
        let seen = sorted(seen);
        prop_assert_eq!(seen.len(), items.len());
        prop_assert!(seen.windows(2).all(|w| w[0] != w[1]), "item stored twice");
    }

    #[test]
    fn root_never_shrinks(items in prop::collection::vec(bounds_strategy(), 1..60)) {
        let mut tree = QuadTree::new();
        let mut previous: Option<Bounds> = None;
        for b in items {
            tree.add(b);
            let root = tree.bounds().unwrap();
            if let Some(prev) = previous {
                prop_assert!(prev.is_inside(&root));
            }
            previous = Some(root);
        }
    }
}
