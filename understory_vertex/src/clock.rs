// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface frame timing.

use hashbrown::HashMap;

/// One frame's timing as seen by a [`FrameClock`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameTick {
    /// Frames ticked so far, starting at 1 for the first tick.
    pub frame: u64,
    /// Milliseconds since the previous tick; zero on the first tick.
    pub delta_ms: f64,
}

/// Frame counter and last-frame timestamp for one render surface.
///
/// The host passes "now" in; the clock never reads time itself.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameClock {
    frame: u64,
    last_ms: Option<f64>,
}

impl FrameClock {
    /// A clock that has not ticked yet.
    pub const fn new() -> Self {
        Self {
            frame: 0,
            last_ms: None,
        }
    }

    /// Advance one frame at `now_ms`.
    ///
    /// Timestamps that run backwards produce a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> FrameTick {
        let delta_ms = self.last_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_ms = Some(now_ms);
        self.frame += 1;
        FrameTick {
            frame: self.frame,
            delta_ms,
        }
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Timestamp of the last tick.
    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Forget all ticks.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Host-chosen identity of a render surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// One [`FrameClock`] per render surface, owned by the host.
#[derive(Clone, Debug, Default)]
pub struct SurfaceClocks {
    clocks: HashMap<SurfaceId, FrameClock>,
}

impl SurfaceClocks {
    /// No surfaces yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick `surface`, creating its clock on first use.
    pub fn tick(&mut self, surface: SurfaceId, now_ms: f64) -> FrameTick {
        self.clocks.entry(surface).or_default().tick(now_ms)
    }

    /// Clock of `surface`, if it ever ticked.
    pub fn get(&self, surface: SurfaceId) -> Option<&FrameClock> {
        self.clocks.get(&surface)
    }

    /// Drop the clock of a surface that went away.
    pub fn remove(&mut self, surface: SurfaceId) -> Option<FrameClock> {
        self.clocks.remove(&surface)
    }

    /// Number of tracked surfaces.
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// True if no surface is tracked.
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}
