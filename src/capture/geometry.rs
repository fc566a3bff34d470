//! Integer geometry in screen pixel coordinates

use std::ops::{Add, Sub};

/// A point in pixel coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle `{x, y, width, height}`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build the normalized rectangle spanned by two corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        let width = (a.x - b.x).unsigned_abs();
        let height = (a.y - b.y).unsigned_abs();
        Self::new(x, y, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// The bottom-right corner (exclusive)
    pub fn end(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rectangle {
        Rectangle::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// The overlapping area of both rectangles, `None` when they do not overlap
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rectangle::new(
                left,
                top,
                (right - left) as u32,
                (bottom - top) as u32,
            ))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let rect = Rectangle::from_corners(Point::new(200, 150), Point::new(100, 100));
        assert_eq!(rect, Rectangle::new(100, 100, 100, 50));
        assert_eq!(rect.end(), Point::new(200, 150));
    }

    #[test]
    fn test_from_corners_degenerate() {
        let rect = Rectangle::from_corners(Point::new(10, 10), Point::new(10, 40));
        assert!(rect.is_empty());
        assert_eq!(rect.height, 30);
    }

    #[test]
    fn test_intersect_partial_overlap() {
        let a = Rectangle::new(0, 0, 100, 100);
        let b = Rectangle::new(50, 80, 100, 100);
        assert_eq!(a.intersect(&b), Some(Rectangle::new(50, 80, 50, 20)));
    }

    #[test]
    fn test_intersect_disjoint_and_touching() {
        let a = Rectangle::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&Rectangle::new(20, 20, 5, 5)), None);
        assert_eq!(a.intersect(&Rectangle::new(10, 0, 5, 5)), None);
    }

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(5, 7) - Point::new(2, 10);
        assert_eq!(p, Point::new(3, -3));
        assert_eq!(p + Point::new(1, 1), Point::new(4, -2));
    }
}
