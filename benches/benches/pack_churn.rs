// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_pack::PackTree;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u32(&mut self, below: u32) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 33) as u32 % below
    }
}

/// Label-like sizes: wide and short, a handful of heights.
fn gen_sizes(count: usize) -> Vec<(u32, u32)> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| (8 + rng.next_u32(120), 10 + 2 * rng.next_u32(8)))
        .collect()
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_fill");
    for &count in &[256usize, 1024, 4096] {
        let sizes = gen_sizes(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("insert_{}", count), |b| {
            b.iter_batched(
                || PackTree::<u32>::new(2048, 2048),
                |mut tree| {
                    let mut placed = 0_usize;
                    for (i, &(w, h)) in (0_u32..).zip(sizes.iter()) {
                        if let Ok(Some(_)) = tree.insert(w, h, i) {
                            placed += 1;
                        }
                    }
                    black_box(placed);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_churn");
    let sizes = gen_sizes(1024);
    group.throughput(Throughput::Elements(sizes.len() as u64));
    group.bench_function("remove_half_refill", |b| {
        b.iter_batched(
            || {
                let mut tree = PackTree::<u32>::new(2048, 2048);
                for (i, &(w, h)) in (0_u32..).zip(sizes.iter()) {
                    let _ = tree.insert(w, h, i);
                }
                tree
            },
            |mut tree| {
                for i in (0_u32..).step_by(2).take(sizes.len() / 2) {
                    let _ = tree.remove(i);
                }
                for (i, &(w, h)) in (0_u32..).step_by(2).zip(sizes.iter().step_by(2)) {
                    let _ = tree.insert(w, h, i);
                }
                black_box(tree.node_count());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_fill, bench_churn);
criterion_main!(benches);
