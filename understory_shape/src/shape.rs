// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable shape variants and the shared [`Bounded`] capability.

use kurbo::{Circle, CubicBez, ParamCurve, ParamCurveExtrema, ParamCurveNearest, Point};

use crate::bounds::Bounds;

/// Accuracy passed to Kurbo's nearest-point solver for curves.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Capability shared by everything that can be spatially indexed or hit-tested.
pub trait Bounded {
    /// Conservative axis-aligned bounds.
    fn bounding_box(&self) -> Bounds;

    /// True if `p` hits the shape. Defaults to a bounding-box test.
    fn contains_point(&self, p: Point) -> bool {
        self.bounding_box().contains_point(p)
    }

    /// Distance from `p` to the shape, zero on a hit. Defaults to the bounding box distance.
    fn distance_to(&self, p: Point) -> f64 {
        self.bounding_box().distance_to(p)
    }
}

impl Bounded for Bounds {
    fn bounding_box(&self) -> Bounds {
        *self
    }

    fn contains_point(&self, p: Point) -> bool {
        Self::contains_point(self, p)
    }

    fn distance_to(&self, p: Point) -> f64 {
        Self::distance_to(self, p)
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn bounding_box(&self) -> Bounds {
        (**self).bounding_box()
    }

    fn contains_point(&self, p: Point) -> bool {
        (**self).contains_point(p)
    }

    fn distance_to(&self, p: Point) -> f64 {
        (**self).distance_to(p)
    }
}

/// A stroked cubic curve, as used for edges and chord ribbons.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Curve {
    /// Center line of the stroke.
    pub path: CubicBez,
    /// Full stroke width.
    pub width: f64,
}

impl Curve {
    /// Create a stroked curve.
    pub fn new(path: CubicBez, width: f64) -> Self {
        Self { path, width }
    }

    fn half_width(&self) -> f64 {
        (self.width * 0.5).max(0.0)
    }
}

/// Geometry of one drawable record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box.
    Rect(Bounds),
    /// Filled circle.
    Circle(Circle),
    /// Stroked cubic curve.
    Curve(Curve),
}

impl Bounded for Shape {
    fn bounding_box(&self) -> Bounds {
        match self {
            Self::Rect(b) => *b,
            Self::Circle(c) => {
                let r = c.radius;
                Bounds::new(c.center.x - r, c.center.y + r, 2.0 * r, 2.0 * r)
            }
            Self::Curve(curve) => {
                let hw = curve.half_width();
                Bounds::from_rect(curve.path.bounding_box().inflate(hw, hw))
            }
        }
    }

    fn contains_point(&self, p: Point) -> bool {
        match self {
            Self::Rect(b) => b.contains_point(p),
            Self::Circle(c) => c.center.distance(p) <= c.radius,
            Self::Curve(_) => self.distance_to(p) <= 0.0,
        }
    }

    fn distance_to(&self, p: Point) -> f64 {
        match self {
            Self::Rect(b) => b.distance_to(p),
            Self::Circle(c) => (c.center.distance(p) - c.radius).max(0.0),
            Self::Curve(curve) => {
                let nearest = curve.path.nearest(p, NEAREST_ACCURACY);
                let on_path = curve.path.eval(nearest.t);
                (on_path.distance(p) - curve.half_width()).max(0.0)
            }
        }
    }
}

impl From<Bounds> for Shape {
    fn from(b: Bounds) -> Self {
        Self::Rect(b)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

impl From<Curve> for Shape {
    fn from(c: Curve) -> Self {
        Self::Curve(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_capabilities() {
        let s = Shape::from(Circle::new((10.0, 10.0), 5.0));
        assert_eq!(s.bounding_box(), Bounds::new(5.0, 15.0, 10.0, 10.0));
        assert!(s.contains_point(Point::new(12.0, 12.0)));
        // Inside the box but outside the disc.
        assert!(!s.contains_point(Point::new(14.5, 14.5)));
        assert_eq!(s.distance_to(Point::new(20.0, 10.0)), 5.0);
    }

    #[test]
    fn straight_curve_distance_uses_stroke() {
        let path = CubicBez::new((0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0));
        let s = Shape::from(Curve::new(path, 4.0));
        let bb = s.bounding_box();
        assert_eq!(bb.y, 2.0);
        assert_eq!(bb.bottom(), -2.0);
        assert!(s.contains_point(Point::new(15.0, 1.5)));
        assert!(!s.contains_point(Point::new(15.0, 3.0)));
        let d = s.distance_to(Point::new(15.0, 7.0));
        assert!(d > 5.0 - 1e-6 && d < 5.0 + 1e-6, "distance was {d}");
    }

    #[test]
    fn rect_and_reference_delegate() {
        let b = Bounds::new(0.0, 4.0, 4.0, 4.0);
        let s = Shape::Rect(b);
        let by_ref: &Shape = &s;
        assert_eq!(by_ref.bounding_box(), b);
        assert!(by_ref.contains_point(Point::new(1.0, 1.0)));
    }
}
