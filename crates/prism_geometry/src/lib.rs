//! Prism Geometry
//!
//! Shapes, path data, bounds and hit testing:
//!
//! - **Geometry**: `LineGeometry`, `RectangleGeometry`, `EllipseGeometry`,
//!   `PathGeometry` and `CombinedGeometry` behind the `Geometry` enum
//! - **Path data**: the abbreviated path mini-language parser and the
//!   `StreamGeometryContext` sink it drives
//! - **Bounds**: canonical point lists and the shared `bounds_helper`
//!   over raw point/flag buffers
//! - **Hit testing**: flattening, stroke outlining and planar regions
//!   producing `IntersectionDetail` results
//!
//! # Example
//!
//! ```rust
//! use prism_core::{Point, Rect};
//! use prism_geometry::{Geometry, PathGeometry};
//!
//! let path = PathGeometry::parse("M 0,0 L 10,0 10,10 Z").unwrap();
//! let geometry = Geometry::from(path);
//!
//! assert_eq!(geometry.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
//! assert!(geometry.fill_contains(Point::new(8.0, 2.0)));
//! ```

pub mod arc;
pub mod bounds;
pub mod context;
pub mod ellipse;
pub mod error;
pub mod flatten;
pub mod geometry;
pub mod line;
pub mod parser;
pub mod path;
pub mod rectangle;
pub mod region;
pub mod segment;
pub mod stroke;

pub use bounds::bounds_helper;
pub use context::StreamGeometryContext;
pub use ellipse::EllipseGeometry;
pub use error::{ParseError, ParseErrorKind};
pub use geometry::{CombinedGeometry, Geometry, GeometryCombineMode, HitTestQuery};
pub use line::LineGeometry;
pub use parser::parse_path_data;
pub use path::{
    FillRule, PathFigure, PathGeometry, PathGeometryBuilder, PathSegment, PathSegmentKind,
    SweepDirection,
};
pub use rectangle::RectangleGeometry;
pub use region::{Edge, PreparedRegion, Region};
pub use segment::{FigureData, RawFigure, SegmentFlags};
