// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packing basics.
//!
//! Fill a small atlas until it runs out of room, free a region, and reuse it.
//!
//! Run:
//! - `cargo run -p understory_demos --example pack_basics`

use understory_pack::{PackError, PackTree};

fn main() {
    let mut tree = PackTree::new(64, 64);

    for (id, (w, h)) in [(40, 22), (20, 20), (30, 10), (22, 12), (30, 30)]
        .into_iter()
        .enumerate()
    {
        match tree.insert(w, h, id) {
            Ok(Some(p)) => println!("#{id} {w}x{h} -> slot {:?}, draw {:?}", p.slot, p.draw),
            Ok(None) => println!("#{id} {w}x{h} -> no room"),
            Err(e) => println!("#{id} {w}x{h} -> rejected: {e}"),
        }
    }
    println!(
        "{} of {} px used in {} nodes",
        tree.used_area(),
        u64::from(tree.width()) * u64::from(tree.height()),
        tree.node_count()
    );

    // Freed space coalesces and is handed out again.
    assert!(tree.remove(0), "occupant 0 was placed");
    if let Ok(Some(p)) = tree.insert(36, 20, 9) {
        println!("#9 36x20 reuses {:?}", p.slot);
    }

    // Requests larger than the atlas are errors, not "full".
    assert!(matches!(
        tree.insert(80, 8, 10),
        Err(PackError::TooLarge { .. })
    ));

    for (id, rect) in tree.occupants() {
        println!("  #{id}: {rect:?}");
    }
}
