// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_vertex::{AttributeSize, AttributeSpec, BufferReconciler, make_buffer};

const QUAD: usize = 6;

const LAYOUT: [AttributeSpec; 3] = [
    AttributeSpec::new("position", AttributeSize::Two),
    AttributeSpec::new("color", AttributeSize::Four),
    AttributeSpec::new("uv", AttributeSize::Two),
];

fn gen_quads(count: usize) -> Rc<[[f32; 4]]> {
    (0..count)
        .map(|i| {
            let f = (i % 1024) as f32;
            [f, f * 0.5, 8.0, 8.0]
        })
        .collect()
}

fn write_quad(_: usize, q: &[f32; 4], slots: &mut [understory_vertex::AttributeSlot<'_>]) {
    let [x, y, w, h] = *q;
    let corners = [
        [x, y],
        [x + w, y],
        [x, y - h],
        [x + w, y],
        [x + w, y - h],
        [x, y - h],
    ];
    for (v, c) in corners.iter().enumerate() {
        slots[0].set(v, c);
    }
    slots[1].fill(&[1.0, 1.0, 1.0, 1.0]);
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("vertex_rewrite");
    for &count in &[1_000usize, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("fresh_list_{}", count), |b| {
            let mut buffer = make_buffer(count * QUAD, &LAYOUT);
            let mut reconciler = BufferReconciler::new();
            b.iter_batched(
                || gen_quads(count),
                |quads| {
                    let wrote =
                        reconciler.update_buffer(&quads, &mut buffer, QUAD, count, false, write_quad);
                    black_box(wrote);
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("unchanged_list_{}", count), |b| {
            let mut buffer = make_buffer(count * QUAD, &LAYOUT);
            let mut reconciler = BufferReconciler::new();
            let quads = gen_quads(count);
            let _ = reconciler.update_buffer(&quads, &mut buffer, QUAD, count, false, write_quad);
            b.iter(|| {
                black_box(reconciler.update_buffer(
                    &quads,
                    &mut buffer,
                    QUAD,
                    count,
                    false,
                    write_quad,
                ))
            });
        });
    }
    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("vertex_streaming");
    let batches: Vec<_> = [500usize, 2_000, 250].iter().map(|&n| gen_quads(n)).collect();
    let total: usize = batches.iter().map(|b| b.len()).sum();
    group.throughput(Throughput::Elements(total as u64));
    group.bench_function("three_categories_grow", |b| {
        b.iter_batched(
            || make_buffer::<[f32; 4]>(0, &LAYOUT),
            |mut buffer| {
                let mut reconciler = BufferReconciler::new();
                reconciler.begin_updates();
                for batch in &batches {
                    let _ = reconciler.update_buffer(
                        batch,
                        &mut buffer,
                        QUAD,
                        batch.len(),
                        false,
                        write_quad,
                    );
                }
                black_box(reconciler.end_updates());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_rewrite, bench_streaming);
criterion_main!(benches);
