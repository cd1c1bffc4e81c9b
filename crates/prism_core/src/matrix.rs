//! 2D affine matrix
//!
//! Row-vector convention: a point transforms as `p' = p * M`, so `a * b`
//! applies `a` first and `b` second. Pushing a local transform `L` under an
//! accumulated world transform `W` therefore produces `L * W`.

use std::ops::Mul;

use crate::types::{Point, Vector};

/// 2D affine transformation
///
/// ```text
/// | m11  m12  0 |
/// | m21  m22  0 |
/// | ox   oy   1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            offset_x,
            offset_y,
        }
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation around the origin, angle in degrees
    pub fn rotation(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Rotation around `center`, angle in degrees
    pub fn rotation_at(degrees: f64, center: Point) -> Self {
        Self::translation(-center.x, -center.y)
            * Self::rotation(degrees)
            * Self::translation(center.x, center.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Inverse transform, `None` when the matrix is singular
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        Some(Matrix {
            m11: self.m22 / det,
            m12: -self.m12 / det,
            m21: -self.m21 / det,
            m22: self.m11 / det,
            offset_x: (self.m21 * self.offset_y - self.m22 * self.offset_x) / det,
            offset_y: (self.m12 * self.offset_x - self.m11 * self.offset_y) / det,
        })
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            p.x * self.m11 + p.y * self.m21 + self.offset_x,
            p.x * self.m12 + p.y * self.m22 + self.offset_y,
        )
    }

    /// Transform a displacement (ignores the offset)
    pub fn transform_vector(&self, v: Vector) -> Vector {
        Vector::new(
            v.x * self.m11 + v.y * self.m21,
            v.x * self.m12 + v.y * self.m22,
        )
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    /// `self` then `other`
    fn mul(self, other: Matrix) -> Matrix {
        Matrix {
            m11: self.m11 * other.m11 + self.m12 * other.m21,
            m12: self.m11 * other.m12 + self.m12 * other.m22,
            m21: self.m21 * other.m11 + self.m22 * other.m21,
            m22: self.m21 * other.m12 + self.m22 * other.m22,
            offset_x: self.offset_x * other.m11 + self.offset_y * other.m21 + other.offset_x,
            offset_y: self.offset_x * other.m12 + self.offset_y * other.m22 + other.offset_y,
        }
    }
}
