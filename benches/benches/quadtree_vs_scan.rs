// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_quadtree::QuadTree;
use understory_shape::Bounds;

fn gen_grid_bounds(n: usize, cell: f64) -> Vec<Bounds> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let top = (y + 1) as f64 * cell;
            out.push(Bounds::new(x0, top, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_scattered_bounds(count: usize, extent: f64, size: f64) -> Vec<Bounds> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (extent - size);
        let top = size + rng.next_f64() * (extent - size);
        out.push(Bounds::new(x0, top, size, size));
    }
    out
}

fn scan(items: &[Bounds], area: &Bounds) -> usize {
    items.iter().filter(|b| b.intersects(area)).count()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_build");
    for &n in &[32usize, 64, 128] {
        let items = gen_grid_bounds(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("add_one_by_one_n{}", n), |b| {
            b.iter_batched(
                QuadTree::<Bounds>::new,
                |mut tree| {
                    for r in items.iter().copied() {
                        let _ = tree.add(r);
                    }
                    black_box(tree.node_count());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("add_all_n{}", n), |b| {
            b.iter_batched(
                QuadTree::<Bounds>::new,
                |mut tree| {
                    let ids = tree.add_all(items.iter().copied());
                    black_box(ids.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query");
    let viewport = Bounds::new(400.0, 800.0, 300.0, 300.0);
    for &count in &[1_000usize, 10_000, 50_000] {
        let items = gen_scattered_bounds(count, 4_000.0, 12.0);
        let mut tree = QuadTree::new();
        let _ = tree.add_all(items.iter().copied());
        group.throughput(Throughput::Elements(count as u64));

        group.bench_function(format!("tree_viewport_{}", count), |b| {
            b.iter(|| black_box(tree.query(black_box(&viewport)).count()));
        });
        group.bench_function(format!("scan_viewport_{}", count), |b| {
            b.iter(|| black_box(scan(&items, black_box(&viewport))));
        });
        group.bench_function(format!("tree_hit_test_{}", count), |b| {
            let p = Point::new(512.0, 640.0);
            b.iter(|| black_box(tree.hit_test_point(black_box(p)).map(|(id, _)| id)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
