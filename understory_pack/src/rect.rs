// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel rectangles and the fit test used by the packer.

/// Pixel-space rectangle on an atlas surface.
///
/// The origin is the top-left pixel and `y` grows downward, matching how
/// bitmaps are laid out in memory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackRect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PackRect {
    /// Create a rectangle from its origin and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the last row.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True if the two rectangles share at least one pixel.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if `other` lies entirely within `self`.
    pub const fn contains(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Compare a free region against a request of `width × height`.
    pub const fn fit(&self, width: u32, height: u32) -> Fit {
        if width > self.width || height > self.height {
            Fit::TooSmall
        } else if width == self.width && height == self.height {
            Fit::Exact
        } else {
            Fit::Slack
        }
    }
}

/// Outcome of testing a free region against a request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fit {
    /// The region matches the request exactly.
    Exact,
    /// The request fits with room to spare; the region must be split first.
    Slack,
    /// The request does not fit.
    TooSmall,
}
