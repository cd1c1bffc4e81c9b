//! Line geometry

use prism_core::{Matrix, Pen, Point, Rect, Tolerance, ToleranceType};

use crate::bounds::bounds_helper;
use crate::segment::{FigureData, RawFigure, SegmentFlags};

const SEGMENT_TYPES: [SegmentFlags; 1] = [SegmentFlags::LINE];

/// Straight line between two points
///
/// A line encloses no area, so it only paints when stroked.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineGeometry {
    pub start: Point,
    pub end: Point,
    pub transform: Matrix,
}

impl LineGeometry {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            transform: Matrix::IDENTITY,
        }
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

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
            self.start,
            self.end,
            &self.transform,
            tolerance.value,
            tolerance.kind,
        )
    }

    pub fn get_bounds_helper(
        pen: Option<&Pen>,
        world: &Matrix,
        start: Point,
        end: Point,
        geometry_matrix: &Matrix,
        tolerance: f64,
        tolerance_type: ToleranceType,
    ) -> Rect {
        if pen.is_none() && world.is_identity() && geometry_matrix.is_identity() {
            return Rect::from_points(start, end);
        }

        let points = [start, end];
        bounds_helper(
            pen,
            world,
            &[RawFigure::new(&points, &SEGMENT_TYPES, false)],
            geometry_matrix,
            tolerance,
            tolerance_type,
        )
    }

    pub fn figure_data(&self) -> FigureData {
        FigureData::from_parts(vec![self.start, self.end], SEGMENT_TYPES.to_vec(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{Color, PenLineCap};

    #[test]
    fn test_bounds_without_pen() {
        let line = LineGeometry::new(Point::new(10.0, 0.0), Point::new(0.0, 5.0));
        assert_eq!(line.bounds(), Rect::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn test_stroked_bounds() {
        let pen = Pen::new(Color::BLACK, 2.0).with_caps(PenLineCap::Square);
        let bounds = LineGeometry::get_bounds_helper(
            Some(&pen),
            &Matrix::IDENTITY,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            &Matrix::IDENTITY,
            0.25,
            ToleranceType::Absolute,
        );
        assert!((bounds.x + 1.0).abs() < 1e-9);
        assert!((bounds.width - 12.0).abs() < 1e-9);
        assert!((bounds.height - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_transformed_bounds() {
        let line = LineGeometry::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
            .with_transform(Matrix::rotation(90.0));
        let bounds = line.bounds();
        assert!(bounds.width.abs() < 1e-9);
        assert!((bounds.height - 10.0).abs() < 1e-9);
    }
}
