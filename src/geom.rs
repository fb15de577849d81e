//! Core geometric types and their operations.

use serde::{Deserialize, Serialize};

/// The coordinate type, in layout database units.
pub type Int = i64;

/// Snaps `pos` to the nearest multiple of `grid`.
pub fn snap_to_grid(pos: Int, grid: Int) -> Int {
    assert!(grid > 0);

    let rem = pos.rem_euclid(grid);
    if rem <= grid / 2 {
        pos - rem
    } else {
        pos + grid - rem
    }
}

/// A point in two-dimensional layout-space.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Int,
    pub y: Int,
}

impl Point {
    pub fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Creates a new point scaled by `p.x` in the x-dimension and by `p.y` in
    /// the y-dimension.
    #[inline]
    pub fn scaled(&self, p: Point) -> Self {
        Self::new(self.x * p.x, self.y * p.y)
    }
}

impl std::ops::Add<Point> for Point {
    type Output = Self;
    fn add(self, rhs: Point) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign<Point> for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub<Point> for Point {
    type Output = Self;
    fn sub(self, rhs: Point) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign<Point> for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// A one-dimensional span.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    start: Int,
    stop: Int,
}

impl Span {
    /// Creates a new [`Span`] between two integers.
    pub fn new(start: Int, stop: Int) -> Self {
        use std::cmp::{max, min};
        Self {
            start: min(start, stop),
            stop: max(start, stop),
        }
    }

    pub fn with_start_and_length(start: Int, length: Int) -> Self {
        Self {
            stop: start + length,
            start,
        }
    }

    pub fn with_stop_and_length(stop: Int, length: Int) -> Self {
        Self {
            start: stop - length,
            stop,
        }
    }

    #[inline]
    pub fn start(&self) -> Int {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> Int {
        self.stop
    }

    #[inline]
    pub fn length(&self) -> Int {
        self.stop - self.start
    }

    #[inline]
    pub fn center(&self) -> Int {
        (self.start + self.stop) / 2
    }

    pub fn union(self, other: Self) -> Self {
        use std::cmp::{max, min};
        Self {
            start: min(self.start, other.start),
            stop: max(self.stop, other.stop),
        }
    }

    pub fn translate(self, amount: Int) -> Self {
        Self {
            start: self.start + amount,
            stop: self.stop + amount,
        }
    }
}

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}

impl Rect {
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }

    pub fn from_spans(h: Span, v: Span) -> Self {
        Self {
            p0: Point::new(h.start(), v.start()),
            p1: Point::new(h.stop(), v.stop()),
        }
    }

    #[inline]
    pub fn left(&self) -> Int {
        self.p0.x
    }

    #[inline]
    pub fn right(&self) -> Int {
        self.p1.x
    }

    #[inline]
    pub fn bottom(&self) -> Int {
        self.p0.y
    }

    #[inline]
    pub fn top(&self) -> Int {
        self.p1.y
    }

    #[inline]
    pub fn width(&self) -> Int {
        self.p1.x - self.p0.x
    }

    #[inline]
    pub fn height(&self) -> Int {
        self.p1.y - self.p0.y
    }

    #[inline]
    pub fn area(&self) -> Int {
        self.width() * self.height()
    }

    #[inline]
    pub fn hspan(&self) -> Span {
        Span::new(self.p0.x, self.p1.x)
    }

    #[inline]
    pub fn vspan(&self) -> Span {
        Span::new(self.p0.y, self.p1.y)
    }

    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }

    pub fn translated(&self, p: Point) -> Self {
        Self {
            p0: self.p0 + p,
            p1: self.p1 + p,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self::from_spans(
            self.hspan().union(other.hspan()),
            self.vspan().union(other.vspan()),
        )
    }
}

/// A running bounding box over a set of rectangles.
#[derive(Debug, Copy, Clone, Serialize, PartialEq, Eq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}

impl BoundBox {
    pub fn empty() -> Self {
        Self {
            p0: Point::new(Int::MAX, Int::MAX),
            p1: Point::new(Int::MIN, Int::MIN),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    pub fn union(self, r: Rect) -> Self {
        use std::cmp::{max, min};
        Self {
            p0: Point::new(min(self.p0.x, r.p0.x), min(self.p0.y, r.p0.y)),
            p1: Point::new(max(self.p1.x, r.p1.x), max(self.p1.y, r.p1.y)),
        }
    }

    /// Converts to a [`Rect`].
    ///
    /// # Panics
    ///
    /// Panics if no rectangle was ever accumulated into the bounding box.
    pub fn into_rect(self) -> Rect {
        assert!(!self.is_empty(), "empty bounding box");
        Rect::new(self.p0, self.p1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(120, 50), 100);
        assert_eq!(snap_to_grid(130, 50), 150);
        assert_eq!(snap_to_grid(-70, 50), -50);
    }

    #[test]
    fn test_point_arith() {
        let p = Point::new(3, 4) + Point::new(10, -4);
        assert_eq!(p, Point::new(13, 0));
        assert_eq!(p.scaled(Point::new(1, 0)), Point::new(13, 0));
        assert_eq!(Point::new(5, 7).scaled(Point::new(1, 0)), Point::new(5, 0));
    }

    #[test]
    fn test_span() {
        let s = Span::new(40, 10);
        assert_eq!(s.start(), 10);
        assert_eq!(s.stop(), 40);
        assert_eq!(s.length(), 30);
        assert_eq!(s.union(Span::new(35, 100)), Span::new(10, 100));
        assert_eq!(Span::with_start_and_length(20, 5), Span::new(20, 25));
    }

    #[test]
    fn test_rect() {
        let r = Rect::from_spans(Span::new(0, 100), Span::new(10, 30));
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 20);
        assert_eq!(r.area(), 2000);
        assert_eq!(r.translated(Point::new(5, 5)).bottom(), 15);

        let mut bbox = BoundBox::empty();
        assert!(bbox.is_empty());
        bbox = bbox.union(r);
        bbox = bbox.union(Rect::from_spans(Span::new(-20, 10), Span::new(0, 5)));
        assert_eq!(
            bbox.into_rect(),
            Rect::from_spans(Span::new(-20, 100), Span::new(0, 30))
        );
    }
}
