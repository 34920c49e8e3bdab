//! # Geometry
//!
//! Axis-aligned rectangles in plot-local feet. The origin is the plot's
//! top-left corner, `x` grows to the right and `y` grows toward the back of
//! the plot.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point (or offset) in plot-local feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle. `width` runs along x, `length` along y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, length: f64) -> Self {
        Rect { x, y, width, length }
    }

    /// Rectangle of the given size with its top-left corner at `origin`.
    pub fn at(origin: Point, width: f64, length: f64) -> Self {
        Rect::new(origin.x, origin.y, width, length)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.length
    }

    pub fn area(&self) -> f64 {
        self.width * self.length
    }

    /// Strict bounding-box overlap. Rectangles that only share an edge or a
    /// corner do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True if `inner` lies entirely within (or on the edge of) this rect.
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    /// Pin a `width` x `length` box whose top-left corner wants to be at
    /// `candidate` so that it stays inside this rect.
    ///
    /// If the box is larger than the rect along an axis, the origin pins to
    /// the rect's near edge on that axis.
    pub fn clamp_origin(&self, candidate: Point, width: f64, length: f64) -> Point {
        Point::new(
            pin(candidate.x, self.x, self.right() - width),
            pin(candidate.y, self.y, self.bottom() - length),
        )
    }
}

// f64::clamp panics when min > max, which happens for oversized items.
fn pin(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_detected() {
        let a = Rect::new(5.0, 5.0, 10.0, 10.0);
        let b = Rect::new(8.0, 8.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 5.0, 5.0);
        let c = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_clamp_origin_pins_to_bounds() {
        let envelope = Rect::new(5.0, 5.0, 50.0, 30.0);
        assert_eq!(envelope.clamp_origin(Point::new(0.0, 0.0), 10.0, 6.0), Point::new(5.0, 5.0));
        assert_eq!(
            envelope.clamp_origin(Point::new(100.0, 100.0), 10.0, 6.0),
            Point::new(45.0, 29.0)
        );
    }

    #[test]
    fn test_clamp_origin_oversized_item() {
        let envelope = Rect::new(5.0, 5.0, 10.0, 10.0);
        let pinned = envelope.clamp_origin(Point::new(50.0, -3.0), 20.0, 20.0);
        assert_eq!(pinned, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!outer.contains_rect(&Rect::new(1.0, 1.0, 10.0, 1.0)));
    }
}
