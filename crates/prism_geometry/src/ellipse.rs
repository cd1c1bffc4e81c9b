//! Ellipse geometry

use prism_core::{Matrix, Pen, Point, Rect, Tolerance, ToleranceType};

use crate::arc::ARC_AS_BEZIER;
use crate::bounds::bounds_helper;
use crate::segment::{FigureData, RawFigure, SegmentFlags};

const POINT_COUNT: usize = 13;

const QUADRANT: SegmentFlags = SegmentFlags::BEZIER
    .union(SegmentFlags::CURVED)
    .union(SegmentFlags::SMOOTH_JOIN);

const SEGMENT_TYPES: [SegmentFlags; 4] = [
    QUADRANT.union(SegmentFlags::CLOSED),
    QUADRANT,
    QUADRANT,
    QUADRANT,
];

/// Axis-aligned ellipse
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EllipseGeometry {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub transform: Matrix,
}

impl EllipseGeometry {
    pub fn new(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            transform: Matrix::IDENTITY,
        }
    }

    /// Ellipse inscribed in `rect`
    pub fn from_rect(rect: &Rect) -> Self {
        Self::new(rect.center(), rect.width / 2.0, rect.height / 2.0)
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    /// An ellipse always has a figure, even with zero radii
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn bounds(&self) -> Rect {
        self.get_bounds_internal(None, &Matrix::IDENTITY, Tolerance::default())
    }

    pub fn get_bounds_internal(&self, pen: Option<&Pen>, world: &Matrix, tolerance: Tolerance) -> Rect {
        Self::get_bounds_helper(
            pen,
            world,
            self.center,
            self.radius_x,
            self.radius_y,
            &self.transform,
            tolerance.value,
            tolerance.kind,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn get_bounds_helper(
        pen: Option<&Pen>,
        world: &Matrix,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        geometry_matrix: &Matrix,
        tolerance: f64,
        tolerance_type: ToleranceType,
    ) -> Rect {
        let no_gaps = pen.map_or(true, Pen::does_not_contain_gaps);
        if no_gaps && world.is_identity() && geometry_matrix.is_identity() {
            let half = match pen {
                Some(pen) if Pen::contributes_to_bounds(Some(pen)) => pen.half_thickness(),
                _ => 0.0,
            };
            let (rx, ry) = (radius_x.abs(), radius_y.abs());
            return Rect::new(
                center.x - rx - half,
                center.y - ry - half,
                2.0 * rx + 2.0 * half,
                2.0 * ry + 2.0 * half,
            );
        }

        let points = Self::point_list(center, radius_x, radius_y);
        bounds_helper(
            pen,
            world,
            &[RawFigure::new(&points, &SEGMENT_TYPES, true)],
            geometry_matrix,
            tolerance,
            tolerance_type,
        )
    }

    pub fn segment_types() -> &'static [SegmentFlags] {
        &SEGMENT_TYPES
    }

    /// Four quarter-ellipse Beziers starting at the rightmost point
    pub fn point_list(center: Point, radius_x: f64, radius_y: f64) -> [Point; POINT_COUNT] {
        let (rx, ry) = (radius_x.abs(), radius_y.abs());
        let mid_x = rx * ARC_AS_BEZIER;
        let mid_y = ry * ARC_AS_BEZIER;
        let (cx, cy) = (center.x, center.y);

        [
            Point::new(cx + rx, cy),
            Point::new(cx + rx, cy + mid_y),
            Point::new(cx + mid_x, cy + ry),
            Point::new(cx, cy + ry),
            Point::new(cx - mid_x, cy + ry),
            Point::new(cx - rx, cy + mid_y),
            Point::new(cx - rx, cy),
            Point::new(cx - rx, cy - mid_y),
            Point::new(cx - mid_x, cy - ry),
            Point::new(cx, cy - ry),
            Point::new(cx + mid_x, cy - ry),
            Point::new(cx + rx, cy - mid_y),
            Point::new(cx + rx, cy),
        ]
    }

    pub fn figure_data(&self) -> FigureData {
        FigureData::from_parts(
            Self::point_list(self.center, self.radius_x, self.radius_y).to_vec(),
            SEGMENT_TYPES.to_vec(),
            true,
        )
    }
}
