// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core quad-tree: insertion, bounds growth, queries, and traversal.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Point;
use understory_shape::{Bounded, Bounds};

use crate::types::{ItemId, NodeIdx, QuadTreeConfig};

#[derive(Clone, Debug)]
struct Node {
    bounds: Bounds,
    // TL, TR, BL, BR once split.
    quadrants: Option<[NodeIdx; 4]>,
    items: Vec<ItemId>,
    depth: u8,
}

impl Node {
    fn new(bounds: Bounds, depth: u8) -> Self {
        Self {
            bounds,
            quadrants: None,
            items: Vec::new(),
            depth,
        }
    }
}

/// Region quad-tree over [`Bounded`] items.
///
/// Items are stored once in an arena and referenced by [`ItemId`] from the nodes that
/// hold them. Nodes live in a second arena; the root is always node zero.
pub struct QuadTree<P: Bounded> {
    config: QuadTreeConfig,
    items: Vec<P>,
    item_bounds: Vec<Bounds>,
    nodes: Vec<Node>,
    // False until the root has been sized to real content.
    covered: bool,
    defective: usize,
}

impl<P: Bounded> Debug for QuadTree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.bounds())
            .field("items", &self.items.len())
            .field("nodes", &self.nodes.len())
            .field("defective", &self.defective)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: Bounded> Default for QuadTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of one node, handed to visitors.
pub struct NodeRef<'a, P: Bounded> {
    tree: &'a QuadTree<P>,
    idx: NodeIdx,
}

impl<P: Bounded> Debug for NodeRef<'_, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("bounds", &self.bounds())
            .field("depth", &self.depth())
            .field("items", &self.item_count())
            .field("split", &self.is_split())
            .finish()
    }
}

impl<'a, P: Bounded> NodeRef<'a, P> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.idx.get()]
    }

    /// Region covered by this node.
    pub fn bounds(&self) -> Bounds {
        self.node().bounds
    }

    /// Distance from the root (root is depth zero).
    pub fn depth(&self) -> u8 {
        self.node().depth
    }

    /// True once the node has been divided into quadrants.
    pub fn is_split(&self) -> bool {
        self.node().quadrants.is_some()
    }

    /// Number of items held directly by this node.
    pub fn item_count(&self) -> usize {
        self.node().items.len()
    }

    /// Items held directly by this node (not its quadrants).
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &'a P)> + 'a {
        let tree = self.tree;
        self.node()
            .items
            .iter()
            .map(move |&id| (id, &tree.items[id.index()]))
    }
}

impl<P: Bounded> QuadTree<P> {
    /// Create an empty tree with the default configuration.
    ///
    /// The root takes its bounds from the first item added.
    pub fn new() -> Self {
        Self::with_config(QuadTreeConfig::default())
    }

    /// Create an empty tree with explicit split and growth parameters.
    pub fn with_config(config: QuadTreeConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            item_bounds: Vec::new(),
            nodes: vec![Node::new(Bounds::ZERO, 0)],
            covered: false,
            defective: 0,
        }
    }

    /// Create an empty tree whose root already covers `bounds`.
    pub fn with_bounds(config: QuadTreeConfig, bounds: Bounds) -> Self {
        let mut tree = Self::with_config(config);
        tree.cover(bounds);
        tree
    }

    /// Split and growth parameters in use.
    pub fn config(&self) -> QuadTreeConfig {
        self.config
    }

    /// Root bounds, or `None` while nothing has been covered yet.
    pub fn bounds(&self) -> Option<Bounds> {
        self.covered.then(|| self.nodes[NodeIdx::ROOT.get()].bounds)
    }

    /// Number of items added.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no items were added.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items whose bounds were degenerate (zero area or non-finite).
    pub fn defective_count(&self) -> usize {
        self.defective
    }

    /// Number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node depth currently in the tree.
    pub fn depth(&self) -> u8 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Look up an item by handle.
    pub fn get(&self, id: ItemId) -> Option<&P> {
        self.items.get(id.index())
    }

    /// Bounds recorded for an item when it was added.
    pub fn item_bounds(&self, id: ItemId) -> Option<Bounds> {
        self.item_bounds.get(id.index()).copied()
    }

    /// All items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &P)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, p)| (ItemId::new(i), p))
    }

    /// Drop every item and reset the root.
    pub fn clear(&mut self) {
        self.items.clear();
        self.item_bounds.clear();
        self.nodes.clear();
        self.nodes.push(Node::new(Bounds::ZERO, 0));
        self.covered = false;
        self.defective = 0;
    }

    /// Add a batch of items, growing the root once for the whole batch.
    pub fn add_all<I: IntoIterator<Item = P>>(&mut self, items: I) -> Vec<ItemId> {
        let items: Vec<P> = items.into_iter().collect();
        let batch = items
            .iter()
            .map(Bounded::bounding_box)
            .filter(|b| !b.is_degenerate())
            .reduce(|mut acc, b| {
                acc.encapsulate(&b);
                acc
            });
        if let Some(batch) = batch {
            self.cover(batch);
        }
        items.into_iter().map(|item| self.add(item)).collect()
    }

    /// Add one item, growing the root first if the item falls outside it.
    pub fn add(&mut self, item: P) -> ItemId {
        let bounds = item.bounding_box();
        let degenerate = bounds.is_degenerate();
        if degenerate {
            self.defective += 1;
            tracing::warn!(
                ?bounds,
                "degenerate item bounds; tracking item without spatial partitioning"
            );
        } else if !self.covers(&bounds) {
            self.cover(bounds);
        }

        let id = ItemId::new(self.items.len());
        self.items.push(item);
        self.item_bounds.push(bounds);
        self.place(id);
        id
    }

    /// Grow the root so it contains `area`.
    ///
    /// When growth is needed the root is padded by the configured margin, every
    /// quadrant is discarded, and all items are re-added against the new bounds.
    /// Bounds never shrink.
    pub fn cover(&mut self, area: Bounds) {
        if !(area.x.is_finite()
            && area.y.is_finite()
            && area.width.is_finite()
            && area.height.is_finite())
        {
            tracing::warn!(?area, "ignoring non-finite cover request");
            return;
        }
        if self.covers(&area) {
            return;
        }
        let _span = tracing::debug_span!("quadtree_cover", items = self.items.len()).entered();
        let mut target = area;
        if self.covered {
            target.encapsulate(&self.nodes[NodeIdx::ROOT.get()].bounds);
        }
        let grown = target.pad(self.config.cover_margin);

        self.nodes.clear();
        self.nodes.push(Node::new(grown, 0));
        self.covered = true;
        for i in 0..self.items.len() {
            self.place(ItemId::new(i));
        }
        tracing::debug!(bounds = ?grown, nodes = self.nodes.len(), "quadtree rebuilt");
    }

    fn covers(&self, area: &Bounds) -> bool {
        self.covered && area.is_inside(&self.nodes[NodeIdx::ROOT.get()].bounds)
    }

    fn place(&mut self, id: ItemId) {
        if self.item_bounds[id.index()].is_degenerate() {
            self.nodes[NodeIdx::ROOT.get()].items.push(id);
        } else {
            self.insert_at(NodeIdx::ROOT, id);
        }
    }

    fn insert_at(&mut self, start: NodeIdx, id: ItemId) {
        let bounds = self.item_bounds[id.index()];
        let mut idx = start;
        loop {
            if let Some(quadrants) = self.nodes[idx.get()].quadrants {
                match quadrants
                    .into_iter()
                    .find(|q| bounds.is_inside(&self.nodes[q.get()].bounds))
                {
                    Some(q) => {
                        idx = q;
                        continue;
                    }
                    None => {
                        self.nodes[idx.get()].items.push(id);
                        return;
                    }
                }
            }
            let node = &mut self.nodes[idx.get()];
            node.items.push(id);
            if node.items.len() > self.config.max_items && node.depth < self.config.max_depth {
                self.split(idx);
            }
            return;
        }
    }

    fn split(&mut self, idx: NodeIdx) {
        let Node { bounds, depth, .. } = self.nodes[idx.get()];
        let quadrants = bounds.quadrants().map(|b| {
            let q = NodeIdx::new(self.nodes.len());
            self.nodes.push(Node::new(b, depth + 1));
            q
        });
        self.nodes[idx.get()].quadrants = Some(quadrants);

        let held = core::mem::take(&mut self.nodes[idx.get()].items);
        for id in held {
            if self.item_bounds[id.index()].is_degenerate() {
                self.nodes[idx.get()].items.push(id);
            } else {
                self.insert_at(idx, id);
            }
        }
    }

    /// Items whose bounds overlap `area`.
    pub fn query(&self, area: &Bounds) -> impl Iterator<Item = (ItemId, &P)> + '_ {
        self.query_with(area, |_| {})
    }

    /// Like [`query`](Self::query), calling `visitor` once for each visited node
    /// before its quadrants are descended.
    pub fn query_with<F>(
        &self,
        area: &Bounds,
        visitor: F,
    ) -> impl Iterator<Item = (ItemId, &P)> + '_
    where
        F: FnMut(NodeRef<'_, P>),
    {
        self.gather(visitor, |b| b.intersects(area), |b| b.intersects(area))
    }

    /// Items whose bounds contain `point`.
    pub fn query_point(&self, point: Point) -> impl Iterator<Item = (ItemId, &P)> + '_ {
        self.query_point_with(point, |_| {})
    }

    /// Like [`query_point`](Self::query_point), calling `visitor` once per visited node.
    pub fn query_point_with<F>(
        &self,
        point: Point,
        visitor: F,
    ) -> impl Iterator<Item = (ItemId, &P)> + '_
    where
        F: FnMut(NodeRef<'_, P>),
    {
        self.gather(
            visitor,
            |b| b.contains_point(point),
            |b| b.contains_point(point),
        )
    }

    /// The item under `point` using each item's precise [`Bounded::contains_point`].
    ///
    /// When several items hit, the most recently added one wins.
    pub fn hit_test_point(&self, point: Point) -> Option<(ItemId, &P)> {
        self.query_point(point)
            .filter(|(_, p)| p.contains_point(point))
            .max_by_key(|(id, _)| *id)
    }

    fn gather<F, N, I>(
        &self,
        mut visitor: F,
        node_test: N,
        item_test: I,
    ) -> vec::IntoIter<(ItemId, &P)>
    where
        F: FnMut(NodeRef<'_, P>),
        N: Fn(&Bounds) -> bool,
        I: Fn(&Bounds) -> bool,
    {
        let mut out = Vec::new();
        let mut stack = vec![NodeIdx::ROOT];
        while let Some(idx) = stack.pop() {
            visitor(NodeRef { tree: self, idx });
            let node = &self.nodes[idx.get()];
            for &id in &node.items {
                if item_test(&self.item_bounds[id.index()]) {
                    out.push((id, &self.items[id.index()]));
                }
            }
            if let Some(quadrants) = node.quadrants {
                for q in quadrants.into_iter().rev() {
                    if node_test(&self.nodes[q.get()].bounds) {
                        stack.push(q);
                    }
                }
            }
        }
        out.into_iter()
    }

    /// Depth-first traversal from the root, quadrants in TL, TR, BL, BR order.
    ///
    /// If `f` returns `true` for a node its quadrants are skipped.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(NodeRef<'_, P>) -> bool,
    {
        let mut stack = vec![NodeIdx::ROOT];
        while let Some(idx) = stack.pop() {
            if f(NodeRef { tree: self, idx }) {
                continue;
            }
            if let Some(quadrants) = self.nodes[idx.get()].quadrants {
                stack.extend(quadrants.into_iter().rev());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_64: Bounds = Bounds::new(0.0, 64.0, 64.0, 64.0);

    fn unit(x: f64, y: f64) -> Bounds {
        Bounds::new(x, y, 1.0, 1.0)
    }

    #[test]
    fn first_add_sizes_root_with_margin() {
        let mut tree = QuadTree::new();
        assert_eq!(tree.bounds(), None);
        tree.add(Bounds::new(10.0, 20.0, 4.0, 4.0));
        assert_eq!(tree.bounds(), Some(Bounds::new(9.0, 21.0, 6.0, 6.0)));
    }

    fn hundred() -> QuadTree<Bounds> {
        QuadTree::with_bounds(
            QuadTreeConfig::default(),
            Bounds::new(0.0, 100.0, 100.0, 100.0),
        )
    }

    #[test]
    fn splits_after_five_items() {
        let mut tree = hundred();
        // Two per top quadrant, one per bottom quadrant.
        for (x, y) in [(5.0, 95.0), (10.0, 95.0), (60.0, 95.0), (70.0, 95.0), (5.0, 20.0)] {
            tree.add(unit(x, y));
        }
        assert_eq!(tree.node_count(), 1);
        tree.add(unit(70.0, 20.0));
        assert_eq!(tree.node_count(), 5);

        let mut own = Vec::new();
        tree.visit(|n| {
            own.push((n.depth(), n.item_count()));
            false
        });
        assert_eq!(own, [(0, 0), (1, 2), (1, 2), (1, 1), (1, 1)]);
    }

    #[test]
    fn straddling_item_stays_at_parent() {
        let mut tree = hundred();
        for i in 0..6 {
            tree.add(unit(f64::from(i) * 2.0, 99.0));
        }
        // Crosses the vertical midline at x = 50.
        let straddler = tree.add(Bounds::new(40.0, 80.0, 20.0, 5.0));
        let mut root_items = Vec::new();
        tree.visit(|n| {
            if n.depth() == 0 {
                root_items.extend(n.items().map(|(id, _)| id));
            }
            true
        });
        assert_eq!(root_items, [straddler]);
    }

    #[test]
    fn growth_reinserts_everything() {
        let mut tree = QuadTree::new();
        let ids: Vec<_> = (0..20).map(|i| tree.add(unit(f64::from(i), 0.0))).collect();
        let before = tree.bounds().unwrap();
        let far = tree.add(unit(500.0, -500.0));
        let after = tree.bounds().unwrap();
        assert!(before.is_inside(&after));
        for id in ids.into_iter().chain([far]) {
            let b = tree.item_bounds(id).unwrap();
            assert!(tree.query(&b).any(|(hit, _)| hit == id));
        }
    }

    #[test]
    fn degenerate_items_are_tracked_not_partitioned() {
        let mut tree = QuadTree::new();
        let ok = tree.add(unit(0.0, 0.0));
        let flat = tree.add(Bounds::new(0.5, -0.5, 0.0, 0.0));
        let nan = tree.add(Bounds::new(f64::NAN, 0.0, 1.0, 1.0));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.defective_count(), 2);
        let root = tree.bounds().unwrap();
        assert!(!root.x.is_nan());
        let hits: Vec<_> = tree.query(&root).map(|(id, _)| id).collect();
        assert!(hits.contains(&ok));
        assert!(hits.contains(&flat));
        assert!(!hits.contains(&nan));
    }

    #[test]
    fn point_query_and_hit_test() {
        let mut tree = QuadTree::new();
        let a = tree.add(Bounds::new(0.0, 10.0, 10.0, 10.0));
        let b = tree.add(Bounds::new(5.0, 10.0, 10.0, 10.0));
        let p = Point::new(7.0, 5.0);
        assert_eq!(tree.query_point(p).count(), 2);
        assert_eq!(tree.hit_test_point(p).map(|(id, _)| id), Some(b));
        let q = Point::new(1.0, 5.0);
        assert_eq!(tree.hit_test_point(q).map(|(id, _)| id), Some(a));
        assert!(tree.hit_test_point(Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn visitor_sees_each_visited_node_once() {
        let mut tree = QuadTree::with_bounds(QuadTreeConfig::default(), SQUARE_64);
        for i in 0..8 {
            for j in 0..8 {
                tree.add(unit(f64::from(i) * 8.0, 64.0 - f64::from(j) * 8.0 - 1.0));
            }
        }
        let mut visited = Vec::new();
        let n = tree
            .query_with(&Bounds::new(0.0, 64.0, 10.0, 10.0), |node| {
                visited.push(node.bounds());
            })
            .count();
        assert!(n > 0);
        assert!(visited.len() < tree.node_count());
        for (i, a) in visited.iter().enumerate() {
            assert!(!visited[i + 1..].contains(a), "node visited twice");
        }
    }

    #[test]
    fn visit_prunes_children() {
        let mut tree = QuadTree::with_bounds(QuadTreeConfig::default(), SQUARE_64);
        for i in 0..30 {
            tree.add(unit(f64::from(i), 60.0));
        }
        let mut all = 0;
        tree.visit(|_| {
            all += 1;
            false
        });
        assert_eq!(all, tree.node_count());
        let mut pruned = 0;
        tree.visit(|_| {
            pruned += 1;
            true
        });
        assert_eq!(pruned, 1);
    }

    #[test]
    fn depth_is_capped() {
        let config = QuadTreeConfig {
            max_depth: 3,
            ..QuadTreeConfig::default()
        };
        let mut tree = QuadTree::with_bounds(config, SQUARE_64);
        for _ in 0..50 {
            tree.add(Bounds::new(0.0, 64.0, 0.5, 0.5));
        }
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.query(&Bounds::new(0.0, 64.0, 1.0, 1.0)).count(), 50);
    }
}
