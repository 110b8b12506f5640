// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rasterization boundary and the CPU-side atlas surface.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use futures_util::future::LocalBoxFuture;
use understory_pack::PackRect;

use crate::types::ImageSource;

/// Bytes per RGBA8 pixel.
const BPP: usize = 4;

/// A rasterized image in straight RGBA8, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl Debug for Raster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl Raster {
    /// A raster filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: rgba.repeat(n),
        }
    }

    /// True if the pixel buffer matches the declared size.
    pub fn is_well_formed(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * BPP
    }
}

/// Future returned by a [`Rasterizer`]; `None` means the source could not be loaded.
pub type RasterFuture<'a> = LocalBoxFuture<'a, Option<Raster>>;

/// Turns image sources into pixels.
///
/// Implementations may suspend (network, decoding, font loading). The coordinator
/// starts every rasterization before awaiting any of them.
pub trait Rasterizer {
    /// Rasterize one source.
    fn rasterize<'a>(&'a self, source: &'a ImageSource) -> RasterFuture<'a>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    fn rasterize<'a>(&'a self, source: &'a ImageSource) -> RasterFuture<'a> {
        (**self).rasterize(source)
    }
}

/// CPU copy of an atlas texture in RGBA8, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct AtlasSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Debug for AtlasSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtlasSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl AtlasSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BPP],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, rows top to bottom.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// One pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = self.offset(x, y);
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[at..at + BPP]);
        Some(out)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BPP
    }

    /// Bytes per row of `rect`, or `None` if it leaves the surface.
    fn row_span(&self, rect: PackRect) -> Option<usize> {
        let surface = PackRect::new(0, 0, self.width, self.height);
        surface.contains(&rect).then_some(rect.width as usize * BPP)
    }

    /// Fill `rect` with one color. Returns `false` if `rect` leaves the surface.
    pub fn fill(&mut self, rect: PackRect, rgba: [u8; 4]) -> bool {
        let Some(span) = self.row_span(rect) else {
            return false;
        };
        for row in rect.y..rect.bottom() {
            let at = self.offset(rect.x, row);
            for px in self.pixels[at..at + span].chunks_exact_mut(BPP) {
                px.copy_from_slice(&rgba);
            }
        }
        true
    }

    /// Copy `raster` with its top-left corner at `(x, y)`.
    ///
    /// Returns `false` without writing if the raster is malformed or would leave the surface.
    pub fn blit(&mut self, x: u32, y: u32, raster: &Raster) -> bool {
        if !raster.is_well_formed() {
            return false;
        }
        let rect = PackRect::new(x, y, raster.width, raster.height);
        let Some(span) = self.row_span(rect) else {
            return false;
        };
        for (row, src) in (y..).zip(raster.pixels.chunks_exact(span.max(1))) {
            let at = self.offset(x, row);
            self.pixels[at..at + span].copy_from_slice(src);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_places_rows() {
        let mut surface = AtlasSurface::new(4, 4);
        let mut raster = Raster::solid(2, 2, [1, 2, 3, 4]);
        raster.pixels[12..16].copy_from_slice(&[9, 9, 9, 9]);
        assert!(surface.blit(1, 2, &raster));
        assert_eq!(surface.pixel(1, 2), Some([1, 2, 3, 4]));
        assert_eq!(surface.pixel(2, 3), Some([9, 9, 9, 9]));
        assert_eq!(surface.pixel(0, 2), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn out_of_bounds_writes_are_refused() {
        let mut surface = AtlasSurface::new(4, 4);
        assert!(!surface.blit(3, 3, &Raster::solid(2, 2, [1; 4])));
        assert!(!surface.fill(PackRect::new(0, 0, 5, 1), [1; 4]));
        let bad = Raster {
            width: 2,
            height: 2,
            pixels: vec![0; 3],
        };
        assert!(!surface.blit(0, 0, &bad));
        assert!(surface.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_covers_rect() {
        let mut surface = AtlasSurface::new(4, 4);
        assert!(surface.fill(PackRect::new(2, 0, 2, 2), [7; 4]));
        assert_eq!(surface.pixel(3, 1), Some([7; 4]));
        assert_eq!(surface.pixel(1, 1), Some([0; 4]));
    }
}
