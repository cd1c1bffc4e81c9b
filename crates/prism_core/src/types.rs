//! Core Geometry Types
//!
//! Double-precision points, vectors, sizes and rectangles shared by every
//! prism crate. `Rect` distinguishes a real "empty" value from a zero-sized
//! rectangle at the origin, and tolerates infinite extents so that bounds
//! accumulation never has to special-case unbounded content.

use std::ops::{Add, Mul, Neg, Sub};

use crate::matrix::Matrix;

// ─────────────────────────────────────────────────────────────────────────────
// Point / Vector / Size
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Linear interpolation towards `other`
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y)
    }
}

/// 2D displacement
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    /// Counter-clockwise perpendicular (in a y-down space this points left)
    pub fn perpendicular(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn dot(&self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(&self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, v: Vector) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, v: Vector) -> Point {
        Point::new(self.x - v.x, self.y - v.y)
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, s: f64) -> Vector {
        Vector::new(self.x * s, self.y * s)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rect
// ─────────────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle
///
/// [`Rect::EMPTY`] (positive-infinite origin, negative-infinite size) is the
/// identity for [`Rect::union`] and is what every "nothing here" query returns.
/// It is never equal to a zero-sized rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        x: f64::INFINITY,
        y: f64::INFINITY,
        width: f64::NEG_INFINITY,
        height: f64::NEG_INFINITY,
    };

    /// Rectangle covering the whole plane
    pub const INFINITE: Rect = Rect {
        x: f64::NEG_INFINITY,
        y: f64::NEG_INFINITY,
        width: f64::INFINITY,
        height: f64::INFINITY,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rect containing both points
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        Rect::new(
            min_x,
            min_y,
            p1.x.max(p2.x) - min_x,
            p1.y.max(p2.y) - min_y,
        )
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Rect::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width < 0.0
    }

    /// True when any component is NaN
    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.width.is_nan() || self.height.is_nan()
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        if self.is_empty() {
            f64::NEG_INFINITY
        } else if self.width == f64::INFINITY {
            f64::INFINITY
        } else {
            self.x + self.width
        }
    }

    pub fn bottom(&self) -> f64 {
        if self.is_empty() {
            f64::NEG_INFINITY
        } else if self.height == f64::INFINITY {
            f64::INFINITY
        } else {
            self.y + self.height
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.top())
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Whether two rects overlap or touch
    pub fn intersects_with(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        other.left() <= self.right()
            && other.right() >= self.left()
            && other.top() <= self.bottom()
            && other.bottom() >= self.top()
    }

    /// Intersection of two rects, [`Rect::EMPTY`] when they are disjoint
    pub fn intersect(&self, other: &Rect) -> Rect {
        if !self.intersects_with(other) {
            return Rect::EMPTY;
        }

        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Rect::new(
            left,
            top,
            span(left, right),
            span(top, bottom),
        )
    }

    /// Smallest rect containing both rects
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rect::new(left, top, span(left, right), span(top, bottom))
    }

    /// Expand to include a point
    pub fn union_point(&self, point: Point) -> Rect {
        self.union(&Rect::new(point.x, point.y, 0.0, 0.0))
    }

    /// Translate by a vector (no-op on empty)
    pub fn offset(&self, v: Vector) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect::new(self.x + v.x, self.y + v.y, self.width, self.height)
    }

    /// Grow each side by `dx` horizontally and `dy` vertically
    ///
    /// Shrinking past zero collapses to [`Rect::EMPTY`].
    pub fn inflate(&self, dx: f64, dy: f64) -> Rect {
        if self.is_empty() {
            return *self;
        }

        let width = self.width + 2.0 * dx;
        let height = self.height + 2.0 * dy;
        if width < 0.0 || height < 0.0 {
            return Rect::EMPTY;
        }

        Rect::new(self.x - dx, self.y - dy, width, height)
    }

    /// Axis-aligned bounds of this rect after transformation
    pub fn transform(&self, matrix: &Matrix) -> Rect {
        if self.is_empty() || matrix.is_identity() {
            return *self;
        }

        let corners = [
            matrix.transform_point(self.top_left()),
            matrix.transform_point(self.top_right()),
            matrix.transform_point(self.bottom_right()),
            matrix.transform_point(self.bottom_left()),
        ];

        let mut min_x = corners[0].x;
        let mut min_y = corners[0].y;
        let mut max_x = corners[0].x;
        let mut max_y = corners[0].y;
        for corner in &corners[1..] {
            min_x = nan_min(min_x, corner.x);
            min_y = nan_min(min_y, corner.y);
            max_x = nan_max(max_x, corner.x);
            max_y = nan_max(max_y, corner.y);
        }

        Rect::new(min_x, min_y, span(min_x, max_x), span(min_y, max_y))
    }
}

/// Extent between two edges, infinite when either edge is
fn span(low: f64, high: f64) -> f64 {
    if high == f64::INFINITY || low == f64::NEG_INFINITY {
        f64::INFINITY
    } else {
        (high - low).max(0.0)
    }
}

// `f64::min` swallows NaN; transformed corners must keep it visible so
// callers can detect degenerate input.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
