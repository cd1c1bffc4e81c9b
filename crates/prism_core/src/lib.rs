//! Prism Core
//!
//! Value types shared by the prism geometry and rendering crates:
//!
//! - **Types**: double-precision `Point`, `Vector`, `Size` and `Rect`
//! - **Matrix**: row-vector 2D affine transforms
//! - **Paint**: `Color`, `Brush` and `Pen`
//! - **Hit testing**: the `IntersectionDetail` result lattice
//! - **Tolerance**: curve flattening settings
//!
//! # Example
//!
//! ```rust
//! use prism_core::{Matrix, Point, Rect};
//!
//! let m = Matrix::scale(2.0, 2.0) * Matrix::translation(10.0, 10.0);
//! assert_eq!(m.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 12.0));
//!
//! let bounds = Rect::new(0.0, 0.0, 5.0, 5.0).transform(&m);
//! assert_eq!(bounds, Rect::new(10.0, 10.0, 10.0, 10.0));
//! ```

pub mod brush;
pub mod intersection;
pub mod matrix;
pub mod pen;
pub mod tolerance;
pub mod types;

pub use brush::{Brush, Color, GradientStop};
pub use intersection::IntersectionDetail;
pub use matrix::Matrix;
pub use pen::{DashStyle, Pen, PenLineCap, PenLineJoin};
pub use tolerance::{Tolerance, ToleranceType, STANDARD_FLATTENING_TOLERANCE};
pub use types::{Point, Rect, Size, Vector};
