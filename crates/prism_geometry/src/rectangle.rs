//! Rectangle geometry, optionally with rounded corners

use prism_core::{Matrix, Pen, Point, Rect, Tolerance, ToleranceType};
use smallvec::SmallVec;

use crate::arc::ARC_AS_BEZIER;
use crate::bounds::bounds_helper;
use crate::segment::{FigureData, RawFigure, SegmentFlags};

const SQUARE_POINTS: usize = 5;
const ROUNDED_POINTS: usize = 17;

const SQUARE_TYPES: [SegmentFlags; 4] = [
    SegmentFlags::LINE.union(SegmentFlags::CLOSED),
    SegmentFlags::LINE,
    SegmentFlags::LINE,
    SegmentFlags::LINE,
];

const CORNER: SegmentFlags = SegmentFlags::BEZIER.union(SegmentFlags::CURVED);

const ROUNDED_TYPES: [SegmentFlags; 8] = [
    CORNER.union(SegmentFlags::CLOSED),
    SegmentFlags::LINE,
    CORNER,
    SegmentFlags::LINE,
    CORNER,
    SegmentFlags::LINE,
    CORNER,
    SegmentFlags::LINE,
];

/// Axis-aligned rectangle with optional corner radii
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RectangleGeometry {
    pub rect: Rect,
    pub radius_x: f64,
    pub radius_y: f64,
    pub transform: Matrix,
}

impl RectangleGeometry {
    pub fn new(rect: Rect) -> Self {
        Self::rounded(rect, 0.0, 0.0)
    }

    pub fn rounded(rect: Rect, radius_x: f64, radius_y: f64) -> Self {
        Self {
            rect,
            radius_x,
            radius_y,
            transform: Matrix::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    pub fn point_count(&self) -> usize {
        Self::point_list(&self.rect, self.radius_x, self.radius_y).len()
    }

    pub fn segment_count(&self) -> usize {
        Self::segment_types(&self.rect, self.radius_x, self.radius_y).len()
    }

    /// Local bounds after the geometry's own transform
    pub fn bounds(&self) -> Rect {
        self.get_bounds_internal(None, &Matrix::IDENTITY, Tolerance::default())
    }

    pub fn get_bounds_internal(&self, pen: Option<&Pen>, world: &Matrix, tolerance: Tolerance) -> Rect {
        Self::get_bounds_helper(
            pen,
            world,
            &self.rect,
            self.radius_x,
            self.radius_y,
            &self.transform,
            tolerance.value,
            tolerance.kind,
        )
    }

    /// Bounds of a possibly rounded rectangle without building a geometry
    #[allow(clippy::too_many_arguments)]
    pub fn get_bounds_helper(
        pen: Option<&Pen>,
        world: &Matrix,
        rect: &Rect,
        radius_x: f64,
        radius_y: f64,
        geometry_matrix: &Matrix,
        tolerance: f64,
        tolerance_type: ToleranceType,
    ) -> Rect {
        if rect.is_empty() {
            return Rect::EMPTY;
        }

        let no_gaps = pen.map_or(true, Pen::does_not_contain_gaps);
        if no_gaps && world.is_identity() && geometry_matrix.is_identity() {
            return match pen {
                Some(pen) if Pen::contributes_to_bounds(Some(pen)) => {
                    let half = pen.half_thickness();
                    rect.inflate(half, half)
                }
                _ => *rect,
            };
        }

        let points = Self::point_list(rect, radius_x, radius_y);
        let types = Self::segment_types(rect, radius_x, radius_y);
        bounds_helper(
            pen,
            world,
            &[RawFigure::new(&points, types, true)],
            geometry_matrix,
            tolerance,
            tolerance_type,
        )
    }

    /// Radii clamped to half the rectangle's size
    pub fn clamped_radii(rect: &Rect, radius_x: f64, radius_y: f64) -> (f64, f64) {
        (
            (rect.width / 2.0).min(radius_x.abs()),
            (rect.height / 2.0).min(radius_y.abs()),
        )
    }

    pub fn is_rounded(rect: &Rect, radius_x: f64, radius_y: f64) -> bool {
        let (rx, ry) = Self::clamped_radii(rect, radius_x, radius_y);
        rx != 0.0 && ry != 0.0
    }

    pub fn segment_types(rect: &Rect, radius_x: f64, radius_y: f64) -> &'static [SegmentFlags] {
        if rect.is_empty() {
            &[]
        } else if Self::is_rounded(rect, radius_x, radius_y) {
            &ROUNDED_TYPES
        } else {
            &SQUARE_TYPES
        }
    }

    /// Canonical outline points
    ///
    /// Square corners give 5 points (the last repeats the first). Rounded
    /// corners give 17: each corner is a quarter-ellipse Bezier and the
    /// sides are lines, starting at the top of the left side.
    pub fn point_list(rect: &Rect, radius_x: f64, radius_y: f64) -> SmallVec<[Point; ROUNDED_POINTS]> {
        let mut points = SmallVec::new();
        if rect.is_empty() {
            return points;
        }

        let (left, top) = (rect.left(), rect.top());
        let (right, bottom) = (rect.right(), rect.bottom());

        if !Self::is_rounded(rect, radius_x, radius_y) {
            points.extend([
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
                Point::new(left, top),
            ]);
            debug_assert_eq!(points.len(), SQUARE_POINTS);
            return points;
        }

        let (rx, ry) = Self::clamped_radii(rect, radius_x, radius_y);
        // Distance from the corner to the Bezier control points
        let bx = (1.0 - ARC_AS_BEZIER) * rx;
        let by = (1.0 - ARC_AS_BEZIER) * ry;

        points.extend([
            Point::new(left, top + ry),
            Point::new(left, top + by),
            Point::new(left + bx, top),
            Point::new(left + rx, top),
            Point::new(right - rx, top),
            Point::new(right - bx, top),
            Point::new(right, top + by),
            Point::new(right, top + ry),
            Point::new(right, bottom - ry),
            Point::new(right, bottom - by),
            Point::new(right - bx, bottom),
            Point::new(right - rx, bottom),
            Point::new(left + rx, bottom),
            Point::new(left + bx, bottom),
            Point::new(left, bottom - by),
            Point::new(left, bottom - ry),
            Point::new(left, top + ry),
        ]);
        points
    }

    /// Outline as an owned figure, `None` when empty
    pub fn figure_data(&self) -> Option<FigureData> {
        let points = Self::point_list(&self.rect, self.radius_x, self.radius_y);
        if points.is_empty() {
            return None;
        }
        let types = Self::segment_types(&self.rect, self.radius_x, self.radius_y);
        Some(FigureData::from_parts(points.to_vec(), types.to_vec(), true))
    }
}
