// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense color-cell grid layout.
//!
//! Colors are not bin-packed one by one. They share one rectangular grid of square
//! cells, reserved on the atlas as a single placement, laid out row-major with a row
//! length that keeps the grid roughly square.

use kurbo::Point;
use understory_pack::PackRect;

use crate::error::AtlasError;
use crate::types::{AtlasId, ColorPlacement, UvRect};

/// Size of a color grid before it is placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ColorGrid {
    pub(crate) count: u32,
    pub(crate) cell: u32,
    pub(crate) per_row: u32,
    pub(crate) rows: u32,
    /// Most cells the surface could hold.
    pub(crate) capacity: usize,
}

fn ceil_sqrt(n: u32) -> u32 {
    let r = n.isqrt();
    if r * r < n { r + 1 } else { r }
}

impl ColorGrid {
    /// Lay out `count` cells of `cell × cell` pixels on a `width × height` surface
    /// where each placement costs `padding` extra pixels per axis.
    pub(crate) fn layout(
        count: usize,
        cell: u32,
        width: u32,
        height: u32,
        padding: u32,
    ) -> Result<Self, AtlasError> {
        let max_per_row = width.saturating_sub(padding).checked_div(cell).unwrap_or(0);
        let max_rows = height.saturating_sub(padding).checked_div(cell).unwrap_or(0);
        let capacity = max_per_row as usize * max_rows as usize;
        let over = AtlasError::ColorCapacity {
            colors: count,
            capacity,
        };
        let Ok(n) = u32::try_from(count) else {
            return Err(over);
        };
        let per_row = ceil_sqrt(n).min(max_per_row);
        if per_row == 0 {
            return Err(over);
        }
        let rows = n.div_ceil(per_row);
        if rows > max_rows {
            return Err(over);
        }
        Ok(Self {
            count: n,
            cell,
            per_row,
            rows,
            capacity,
        })
    }

    pub(crate) fn pixel_width(&self) -> u32 {
        self.per_row * self.cell
    }

    pub(crate) fn pixel_height(&self) -> u32 {
        self.rows * self.cell
    }

    /// Pixel rectangle of cell `index` for a grid whose top-left corner is `origin`.
    pub(crate) fn cell_rect(&self, origin: PackRect, index: u32) -> PackRect {
        let col = index % self.per_row;
        let row = index / self.per_row;
        PackRect::new(
            origin.x + col * self.cell,
            origin.y + row * self.cell,
            self.cell,
            self.cell,
        )
    }

    /// Addressing record for cell `index`.
    pub(crate) fn placement(
        &self,
        atlas: AtlasId,
        origin: PackRect,
        index: u32,
        width: u32,
        height: u32,
    ) -> ColorPlacement {
        let w = f64::from(width);
        let h = f64::from(height);
        let half = f64::from(self.cell) * 0.5;
        let first_color = Point::new(
            (f64::from(origin.x) + half) / w,
            1.0 - (f64::from(origin.y) + half) / h,
        );
        let next_color = Point::new(f64::from(self.cell) / w, f64::from(self.cell) / h);
        ColorPlacement {
            atlas,
            uv: UvRect::from_pixels(self.cell_rect(origin, index), width, height),
            color_index: index,
            colors_per_row: self.per_row,
            first_color,
            next_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_balance_against_count() {
        let g = ColorGrid::layout(5, 2, 64, 64, 1).unwrap();
        assert_eq!((g.per_row, g.rows), (3, 2));
        assert_eq!((g.pixel_width(), g.pixel_height()), (6, 4));

        let g = ColorGrid::layout(16, 2, 64, 64, 1).unwrap();
        assert_eq!((g.per_row, g.rows), (4, 4));
    }

    #[test]
    fn row_length_is_capped_by_width() {
        // 31 cells fit across 63 usable pixels; 1000 colors need 33 rows.
        let g = ColorGrid::layout(1000, 2, 64, 128, 1).unwrap();
        assert_eq!(g.per_row, 31);
        assert_eq!(g.rows, 33);
    }

    #[test]
    fn capacity_is_explicit() {
        let err = ColorGrid::layout(1000, 2, 64, 64, 1).unwrap_err();
        assert_eq!(
            err,
            AtlasError::ColorCapacity {
                colors: 1000,
                capacity: 31 * 31
            }
        );
        assert!(ColorGrid::layout(1, 0, 64, 64, 1).is_err());
        assert!(ColorGrid::layout(1, 128, 64, 64, 1).is_err());
    }

    #[test]
    fn cell_addressing_matches_stride() {
        let g = ColorGrid::layout(5, 2, 64, 64, 1).unwrap();
        let origin = PackRect::new(0, 0, 7, 5);
        assert_eq!(g.cell_rect(origin, 4), PackRect::new(2, 2, 2, 2));
        let p = g.placement(AtlasId(0), origin, 4, 64, 64);
        assert_eq!(p.first_color, Point::new(1.0 / 64.0, 1.0 - 1.0 / 64.0));
        assert_eq!(p.next_color, Point::new(2.0 / 64.0, 2.0 / 64.0));
        // The shader-side formula lands on the cell center.
        let col = f64::from(p.color_index % p.colors_per_row);
        let row = f64::from(p.color_index / p.colors_per_row);
        let u = p.first_color.x + col * p.next_color.x;
        let v = p.first_color.y - row * p.next_color.y;
        assert_eq!(Point::new(u, v), p.uv.tl.midpoint(p.uv.br));
    }
}
