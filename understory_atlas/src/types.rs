// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles, placements, and tuning for atlases.

use alloc::string::String;

use kurbo::Point;
use peniko::Color;
use understory_pack::PackRect;

/// Caller-chosen identity of an image or color handle.
///
/// The coordinator annotates handles by key; it never owns the handle itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleKey(pub u64);

/// Identity of one built atlas. Every successful commit gets a fresh id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtlasId(pub(crate) u32);

impl AtlasId {
    /// Raw id value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Per-name build counter. Only a build carrying the current generation may commit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub(crate) u64);

impl Generation {
    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What the rasterizer should produce for an image handle.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// Text rendered with the rasterizer's font at `font_size`.
    Label {
        /// Text to render.
        text: String,
        /// Font size in pixels.
        font_size: f32,
    },
    /// A bitmap loaded from `uri`.
    Bitmap {
        /// Location of the encoded image.
        uri: String,
    },
}

/// A caller-owned image to place on an atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageHandle {
    /// Key under which the placement is recorded.
    pub key: HandleKey,
    /// Content to rasterize.
    pub source: ImageSource,
}

impl ImageHandle {
    /// Handle for a text label.
    pub fn label(key: HandleKey, text: impl Into<String>, font_size: f32) -> Self {
        Self {
            key,
            source: ImageSource::Label {
                text: text.into(),
                font_size,
            },
        }
    }

    /// Handle for a bitmap.
    pub fn bitmap(key: HandleKey, uri: impl Into<String>) -> Self {
        Self {
            key,
            source: ImageSource::Bitmap { uri: uri.into() },
        }
    }
}

/// A caller-owned flat color to place on an atlas color grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorHandle {
    /// Key under which the placement is recorded.
    pub key: HandleKey,
    /// Swatch color.
    pub color: Color,
}

/// Four UV corners of a sub-image in 0..1 atlas space, origin bottom-left.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UvRect {
    /// Top-left.
    pub tl: Point,
    /// Top-right.
    pub tr: Point,
    /// Bottom-left.
    pub bl: Point,
    /// Bottom-right.
    pub br: Point,
}

impl UvRect {
    /// All four corners at the origin.
    pub const ZERO: Self = Self {
        tl: Point::ZERO,
        tr: Point::ZERO,
        bl: Point::ZERO,
        br: Point::ZERO,
    };

    /// UVs for a pixel rectangle on a `width × height` surface.
    ///
    /// The surface origin is top-left, so `v` is flipped.
    pub fn from_pixels(rect: PackRect, width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        let u0 = f64::from(rect.x) / w;
        let u1 = f64::from(rect.right()) / w;
        let v0 = 1.0 - f64::from(rect.y) / h;
        let v1 = 1.0 - f64::from(rect.bottom()) / h;
        Self {
            tl: Point::new(u0, v0),
            tr: Point::new(u1, v0),
            bl: Point::new(u0, v1),
            br: Point::new(u1, v1),
        }
    }
}

/// Where an image landed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImagePlacement {
    /// Atlas holding the pixels; `None` for the placeholder.
    pub atlas: Option<AtlasId>,
    /// UV corners.
    pub uv: UvRect,
    /// Width of the rasterized image.
    pub pixel_width: u32,
    /// Height of the rasterized image.
    pub pixel_height: u32,
}

impl ImagePlacement {
    /// Placeholder for images that failed to load or did not fit.
    pub const DEFAULT: Self = Self {
        atlas: None,
        uv: UvRect::ZERO,
        pixel_width: 0,
        pixel_height: 0,
    };

    /// True for the placeholder.
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where a color landed, plus the grid addressing a shader needs.
///
/// A shader can find cell `i` without a lookup:
/// `u = first_color.x + (i % colors_per_row) * next_color.x` and
/// `v = first_color.y - (i / colors_per_row) * next_color.y`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorPlacement {
    /// Atlas holding the grid.
    pub atlas: AtlasId,
    /// UV corners of this color's cell.
    pub uv: UvRect,
    /// Row-major index of the cell.
    pub color_index: u32,
    /// Cells per grid row.
    pub colors_per_row: u32,
    /// UV of the center of cell zero.
    pub first_color: Point,
    /// UV distance between neighbouring cells along each axis.
    pub next_color: Point,
}

/// Atlas dimensions and color cell size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Side of one square color cell in pixels.
    pub color_cell: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 2048,
            color_cell: 2,
        }
    }
}

bitflags::bitflags! {
    /// Which well-known atlases are built and safe to sample.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AtlasReady: u8 {
        /// The `"labels"` atlas.
        const LABELS = 0b0000_0001;
        /// The `"colors"` atlas.
        const COLORS = 0b0000_0010;
        /// The `"images"` atlas.
        const IMAGES = 0b0000_0100;
    }
}

impl AtlasReady {
    /// Flag for a well-known atlas name; empty for any other name.
    pub fn for_name(name: &str) -> Self {
        match name {
            "labels" => Self::LABELS,
            "colors" => Self::COLORS,
            "images" => Self::IMAGES,
            _ => Self::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_flips_v() {
        let uv = UvRect::from_pixels(PackRect::new(16, 0, 16, 32), 64, 64);
        assert_eq!(uv.tl, Point::new(0.25, 1.0));
        assert_eq!(uv.tr, Point::new(0.5, 1.0));
        assert_eq!(uv.bl, Point::new(0.25, 0.5));
        assert_eq!(uv.br, Point::new(0.5, 0.5));
    }

    #[test]
    fn default_placement_is_zeroed() {
        let d = ImagePlacement::default();
        assert!(d.is_default());
        assert_eq!(d.uv.tl, Point::ZERO);
        assert_eq!(d.uv.br, Point::ZERO);
    }

    #[test]
    fn ready_flags_by_name() {
        assert_eq!(AtlasReady::for_name("labels"), AtlasReady::LABELS);
        assert!(AtlasReady::for_name("custom").is_empty());
    }
}
