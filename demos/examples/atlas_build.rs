// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas build.
//!
//! Build a "labels" atlas from a few text labels and a missing bitmap, then a
//! "colors" atlas from a small palette, and print what each handle resolved to.
//!
//! Run:
//! - `RUST_LOG=understory_atlas=debug cargo run -p understory_demos --example atlas_build`

use std::cell::RefCell;

use futures_util::FutureExt;
use peniko::Color;
use understory_atlas::{
    AtlasConfig, AtlasCoordinator, AtlasReady, ColorHandle, CommitOutcome, HandleKey, ImageHandle,
    ImageSource, Raster, RasterFuture, Rasterizer,
};

/// Stands in for a text shaper: every glyph is half an em wide.
struct BlockText;

impl Rasterizer for BlockText {
    fn rasterize<'a>(&'a self, source: &'a ImageSource) -> RasterFuture<'a> {
        let raster = match source {
            ImageSource::Label { text, font_size } => {
                let h = font_size.round() as u32;
                let w = h * text.chars().count() as u32 / 2;
                Some(Raster::solid(w, h, [255, 255, 255, 255]))
            }
            ImageSource::Bitmap { .. } => None,
        };
        core::future::ready(raster).boxed_local()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let coord = RefCell::new(AtlasCoordinator::new(AtlasConfig {
        width: 256,
        height: 128,
        color_cell: 2,
    }));

    let labels = [
        ImageHandle::label(HandleKey(1), "Zoom to fit", 14.0),
        ImageHandle::label(HandleKey(2), "Export", 14.0),
        ImageHandle::label(HandleKey(3), "Untitled scene", 20.0),
        ImageHandle::bitmap(HandleKey(4), "icons/missing.png"),
    ];
    let outcome = pollster::block_on(AtlasCoordinator::create_atlas(
        &coord, "labels", &labels, &[], &BlockText,
    ));
    let CommitOutcome::Committed(labels_report) = outcome else {
        panic!("nothing else builds \"labels\" concurrently");
    };
    println!("labels: {labels_report:?}");
    assert_eq!((labels_report.placed, labels_report.defaulted), (3, 1));

    let palette: Vec<_> = (0..12_u8)
        .map(|i| ColorHandle {
            key: HandleKey(100 + u64::from(i)),
            color: Color::from_rgba8(i * 20, 255 - i * 20, 128, 255),
        })
        .collect();
    let outcome = pollster::block_on(AtlasCoordinator::create_atlas(
        &coord, "colors", &[], &palette, &BlockText,
    ));
    if let CommitOutcome::Committed(report) = outcome {
        if let Some(e) = report.color_error {
            println!("colors skipped: {e}");
        }
        assert_eq!(report.colors, palette.len(), "a 256x128 atlas holds 12 swatches");
    }

    let coord = coord.borrow();
    assert!(
        coord.image(HandleKey(4)).is_some_and(|p| p.is_default()),
        "the missing bitmap falls back to the placeholder"
    );
    for handle in &labels {
        if let Some(p) = coord.image(handle.key) {
            println!(
                "{:?}: {}x{} px, top-left uv {:?}{}",
                handle.key,
                p.pixel_width,
                p.pixel_height,
                p.uv.tl,
                if p.is_default() { " (placeholder)" } else { "" }
            );
        }
    }
    if let Some(c) = coord.color(HandleKey(105)) {
        println!(
            "color #{} of a {}-wide grid starts at {:?}, stepping {:?}",
            c.color_index, c.colors_per_row, c.first_color, c.next_color
        );
    }
    println!("ready: {:?}", coord.ready());
    assert_eq!(coord.ready(), AtlasReady::LABELS | AtlasReady::COLORS);
    for name in ["labels", "colors"] {
        if let Some(used) = coord.used_area(name) {
            println!("{name}: {used} px used");
        }
    }
}
