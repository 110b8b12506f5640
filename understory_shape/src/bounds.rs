// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned world-space bounds with a top-anchored, y-up convention.

use kurbo::{Point, Rect, Vec2};

/// Axis-aligned bounds in world space.
///
/// The anchor is the top-left corner: `y` is the *top* edge and the box extends
/// downward to `y - height`. This matches a y-up world where larger `y` is higher
/// on screen.
///
/// `width` and `height` are expected to be non-negative. Bounds with zero area
/// or non-finite components are [degenerate](Self::is_degenerate); consumers log
/// them rather than silently accepting them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Extent along +x.
    pub width: f64,
    /// Extent along -y.
    pub height: f64,
}

impl Bounds {
    /// Empty bounds anchored at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create bounds from the top-left anchor and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create bounds from the four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, top - bottom)
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y - height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y - self.height
    }

    /// Area of the box.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center of the box.
    #[inline]
    pub fn mid(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y - self.height * 0.5)
    }

    /// True if the bounds have zero area or carry a non-finite component.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        !finite || !(self.width > 0.0 && self.height > 0.0)
    }

    /// True if `self` lies entirely within `other` (shared edges count as inside).
    ///
    /// Always false when either box carries a NaN.
    pub fn is_inside(&self, other: &Self) -> bool {
        self.x >= other.x
            && self.right() <= other.right()
            && self.y <= other.y
            && self.bottom() >= other.bottom()
    }

    /// True if the two boxes overlap. Touching edges count as overlapping.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y >= other.bottom()
            && self.bottom() <= other.y
    }

    /// True if `p` lies inside or on the boundary.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y <= self.y && p.y >= self.bottom()
    }

    /// Smallest bounds covering both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.x.min(other.x),
            self.y.max(other.y),
            self.right().max(other.right()),
            self.bottom().min(other.bottom()),
        )
    }

    /// Grow in place to cover `other` as well.
    pub fn encapsulate(&mut self, other: &Self) {
        *self = self.union(other);
    }

    /// Grow the box by `margin` on every side.
    pub fn pad(&self, margin: f64) -> Self {
        Self::new(
            self.x - margin,
            self.y + margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Euclidean distance from `p` to the box, zero when inside.
    pub fn distance_to(&self, p: Point) -> f64 {
        let dx = (self.x - p.x).max(p.x - self.right()).max(0.0);
        let dy = (self.bottom() - p.y).max(p.y - self.y).max(0.0);
        Vec2::new(dx, dy).hypot()
    }

    /// Split at the exact midpoint into top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(&self) -> [Self; 4] {
        let w = self.width * 0.5;
        let h = self.height * 0.5;
        let mx = self.x + w;
        let my = self.y - h;
        [
            Self::new(self.x, self.y, w, h),
            Self::new(mx, self.y, self.right() - mx, h),
            Self::new(self.x, my, w, my - self.bottom()),
            Self::new(mx, my, self.right() - mx, my - self.bottom()),
        ]
    }

    /// Convert to a Kurbo rectangle (`y0` is the bottom edge).
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.bottom(), self.right(), self.y)
    }

    /// Convert from a Kurbo rectangle; the rectangle is normalized first.
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs();
        Self::from_edges(r.x0, r.y1, r.x1, r.y0)
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}
