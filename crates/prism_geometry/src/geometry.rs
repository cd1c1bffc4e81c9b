//! Geometry family
//!
//! [`Geometry`] is the closed set of shapes a drawing can reference. Each
//! kind carries its own transform, applied before any world transform.
//! Pens are applied after the geometry transform and before the world
//! transform, so geometry transforms never scale stroke thickness.

use std::sync::Arc;

use prism_core::{IntersectionDetail, Matrix, Pen, Point, Rect, Tolerance};

use crate::bounds::{bounds_helper, nan_rect};
use crate::ellipse::EllipseGeometry;
use crate::flatten::{chain_edges, flatten_figure, flatten_figures, pre_transform_tolerance, Polyline};
use crate::line::LineGeometry;
use crate::path::{FillRule, PathGeometry};
use crate::rectangle::RectangleGeometry;
use crate::region::{Edge, PreparedRegion, Region};
use crate::segment::FigureData;
use crate::stroke::widen;

/// Boolean operation applied by a [`CombinedGeometry`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeometryCombineMode {
    /// Area covered by either geometry
    #[default]
    Union,
    /// Area covered by both geometries
    Intersect,
    /// Area covered by exactly one geometry
    Xor,
    /// Area of the first geometry not covered by the second
    Exclude,
}

/// Two geometries joined by a boolean operation
#[derive(Clone, Debug, PartialEq)]
pub struct CombinedGeometry {
    pub mode: GeometryCombineMode,
    pub first: Arc<Geometry>,
    pub second: Arc<Geometry>,
    pub transform: Matrix,
}

/// Any shape that can be drawn, used as a clip, or hit tested
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Line(LineGeometry),
    Rectangle(RectangleGeometry),
    Ellipse(EllipseGeometry),
    Path(PathGeometry),
    Combined(CombinedGeometry),
}

impl From<LineGeometry> for Geometry {
    fn from(geometry: LineGeometry) -> Self {
        Geometry::Line(geometry)
    }
}

impl From<RectangleGeometry> for Geometry {
    fn from(geometry: RectangleGeometry) -> Self {
        Geometry::Rectangle(geometry)
    }
}

impl From<EllipseGeometry> for Geometry {
    fn from(geometry: EllipseGeometry) -> Self {
        Geometry::Ellipse(geometry)
    }
}

impl From<PathGeometry> for Geometry {
    fn from(geometry: PathGeometry) -> Self {
        Geometry::Path(geometry)
    }
}

impl From<CombinedGeometry> for Geometry {
    fn from(geometry: CombinedGeometry) -> Self {
        Geometry::Combined(geometry)
    }
}

impl Geometry {
    /// Combine two geometries, optionally transforming the result
    pub fn combine(
        first: Arc<Geometry>,
        second: Arc<Geometry>,
        mode: GeometryCombineMode,
        transform: Option<&Matrix>,
    ) -> Geometry {
        Geometry::Combined(CombinedGeometry {
            mode,
            first,
            second,
            transform: transform.copied().unwrap_or(Matrix::IDENTITY),
        })
    }

    pub fn transform(&self) -> &Matrix {
        match self {
            Geometry::Line(g) => &g.transform,
            Geometry::Rectangle(g) => &g.transform,
            Geometry::Ellipse(g) => &g.transform,
            Geometry::Path(g) => &g.transform,
            Geometry::Combined(g) => &g.transform,
        }
    }

    fn transform_mut(&mut self) -> &mut Matrix {
        match self {
            Geometry::Line(g) => &mut g.transform,
            Geometry::Rectangle(g) => &mut g.transform,
            Geometry::Ellipse(g) => &mut g.transform,
            Geometry::Path(g) => &mut g.transform,
            Geometry::Combined(g) => &mut g.transform,
        }
    }

    /// Copy with `matrix` applied after the geometry's own transform
    pub fn get_transformed_copy(&self, matrix: &Matrix) -> Geometry {
        let mut copy = self.clone();
        let combined = *self.transform() * *matrix;
        *copy.transform_mut() = combined;
        copy
    }

    /// True when the geometry encloses nothing and draws nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Line(g) => g.is_empty(),
            Geometry::Rectangle(g) => g.is_empty(),
            Geometry::Ellipse(g) => g.is_empty(),
            Geometry::Path(g) => g.is_empty(),
            Geometry::Combined(_) => {
                let tolerance = self.resolve_tolerance(Tolerance::default());
                self.fill_region(&Matrix::IDENTITY, tolerance)
                    .boundary()
                    .is_empty()
            }
        }
    }

    pub fn fill_rule(&self) -> FillRule {
        match self {
            Geometry::Path(g) => g.fill_rule,
            _ => FillRule::EvenOdd,
        }
    }

    /// Bounds including the geometry's own transform
    pub fn bounds(&self) -> Rect {
        self.get_bounds_internal(None, &Matrix::IDENTITY, Tolerance::default())
    }

    /// Bounds when stroked with `pen` and drawn under `world`
    pub fn get_bounds_internal(&self, pen: Option<&Pen>, world: &Matrix, tolerance: Tolerance) -> Rect {
        match self {
            Geometry::Line(g) => g.get_bounds_internal(pen, world, tolerance),
            Geometry::Rectangle(g) => g.get_bounds_internal(pen, world, tolerance),
            Geometry::Ellipse(g) => g.get_bounds_internal(pen, world, tolerance),
            Geometry::Path(g) => {
                let figures = g.figure_data();
                let raw: Vec<_> = figures.iter().map(FigureData::as_raw).collect();
                bounds_helper(pen, world, &raw, &g.transform, tolerance.value, tolerance.kind)
            }
            Geometry::Combined(_) => self.combined_bounds(pen, world, tolerance),
        }
    }

    fn combined_bounds(&self, pen: Option<&Pen>, world: &Matrix, tolerance: Tolerance) -> Rect {
        let local_tolerance = pre_transform_tolerance(self.resolve_tolerance(tolerance), world);
        let boundary = self
            .fill_region(&Matrix::IDENTITY, local_tolerance)
            .boundary();

        let mut points: Vec<Point> = boundary.iter().flat_map(|e| [e.from, e.to]).collect();

        if let Some(pen) = pen.filter(|p| Pen::contributes_to_bounds(Some(*p))) {
            let mut polygons = Vec::new();
            for line in chain_edges(&boundary, chain_epsilon(&boundary)) {
                widen(&line, pen, local_tolerance, &mut polygons);
            }
            points.extend(polygons.into_iter().flatten());
        }

        let mut bounds = Rect::EMPTY;
        for p in points {
            let p = world.transform_point(p);
            if p.x.is_nan() || p.y.is_nan() {
                return nan_rect();
            }
            bounds = bounds.union_point(p);
        }
        bounds
    }

    /// Bounds of every control point after the geometry's transform
    pub fn control_bounds(&self) -> Rect {
        match self {
            Geometry::Combined(g) => g
                .first
                .control_bounds()
                .union(&g.second.control_bounds())
                .transform(&g.transform),
            _ => self.figure_data().iter().fold(Rect::EMPTY, |bounds, figure| {
                bounds.union(&figure.as_raw().control_bounds(self.transform()))
            }),
        }
    }

    /// Absolute flattening tolerance for this geometry
    pub fn resolve_tolerance(&self, tolerance: Tolerance) -> f64 {
        let control = self.control_bounds();
        let extent = if control.is_empty() {
            0.0
        } else {
            control.width.max(control.height)
        };
        tolerance.resolve(extent)
    }

    /// Untransformed figures of a simple geometry; empty for combined ones
    pub fn figure_data(&self) -> Vec<FigureData> {
        match self {
            Geometry::Line(g) => vec![g.figure_data()],
            Geometry::Rectangle(g) => g.figure_data().into_iter().collect(),
            Geometry::Ellipse(g) => vec![g.figure_data()],
            Geometry::Path(g) => g.figure_data(),
            Geometry::Combined(_) => Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Regions
    // ─────────────────────────────────────────────────────────────────────────

    /// Filled area under `world`, flattened to `tolerance` in world units
    pub fn fill_region(&self, world: &Matrix, tolerance: f64) -> Region {
        let matrix = *self.transform() * *world;

        if let Geometry::Combined(g) = self {
            return Region::combined(
                g.mode,
                g.first.fill_region(&matrix, tolerance),
                g.second.fill_region(&matrix, tolerance),
            );
        }

        let contours = self
            .figure_data()
            .iter()
            .filter(|figure| figure.filled)
            .filter_map(|figure| flatten_figure(&figure.as_raw(), &matrix, tolerance))
            .map(|line| line.contour().to_vec())
            .collect();

        Region::polygons(contours, self.fill_rule())
    }

    /// Area painted by stroking with `pen` under `world`
    pub fn stroke_region(&self, pen: &Pen, world: &Matrix, tolerance: f64) -> Region {
        let local_tolerance = pre_transform_tolerance(tolerance, world);

        let mut polygons = Vec::new();
        for line in self.stroke_polylines(local_tolerance) {
            widen(&line, pen, local_tolerance, &mut polygons);
        }

        let contours = polygons
            .into_iter()
            .map(|polygon| polygon.into_iter().map(|p| world.transform_point(p)).collect())
            .collect();

        Region::polygons(contours, FillRule::Nonzero)
    }

    /// Stroked outline as polylines after the geometry's transform
    fn stroke_polylines(&self, tolerance: f64) -> Vec<Polyline> {
        match self {
            Geometry::Combined(_) => {
                let boundary = self.fill_region(&Matrix::IDENTITY, tolerance).boundary();
                chain_edges(&boundary, chain_epsilon(&boundary))
            }
            _ => {
                let figures = self.figure_data();
                flatten_figures(figures.iter().map(FigureData::as_raw), self.transform(), tolerance)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hit testing
    // ─────────────────────────────────────────────────────────────────────────

    /// How `query` relates to the filled area
    pub fn fill_contains_with_detail(&self, query: &HitTestQuery) -> IntersectionDetail {
        if query.is_empty() || self.is_empty() {
            return IntersectionDetail::Empty;
        }

        let drawn = PreparedRegion::new(self.fill_region(&Matrix::IDENTITY, query.tolerance()));
        drawn.relate(query.region())
    }

    /// How `query` relates to the area painted by stroking with `pen`
    pub fn stroke_contains_with_detail(&self, pen: &Pen, query: &HitTestQuery) -> IntersectionDetail {
        if pen.thickness == 0.0 || pen.thickness.is_nan() || query.is_empty() {
            return IntersectionDetail::Empty;
        }

        let drawn = PreparedRegion::new(self.stroke_region(pen, &Matrix::IDENTITY, query.tolerance()));
        drawn.relate(query.region())
    }

    /// Whether `point` lies in the filled area, edges included
    pub fn fill_contains(&self, point: Point) -> bool {
        let tolerance = self.resolve_tolerance(Tolerance::default());
        let region = self.fill_region(&Matrix::IDENTITY, tolerance);
        if !region.bounds().inflate(tolerance, tolerance).contains(point) {
            return false;
        }
        PreparedRegion::new(region).contains_point(point)
    }

    /// Whether `point` lies in the area painted by stroking with `pen`
    pub fn stroke_contains(&self, pen: &Pen, point: Point) -> bool {
        if pen.thickness == 0.0 || pen.thickness.is_nan() {
            return false;
        }

        let tolerance = self.resolve_tolerance(Tolerance::default());
        let region = self.stroke_region(pen, &Matrix::IDENTITY, tolerance);
        if !region.bounds().contains(point) {
            return false;
        }
        PreparedRegion::new(region).contains_point(point)
    }
}

fn chain_epsilon(edges: &[Edge]) -> f64 {
    let bounds = edges
        .iter()
        .fold(Rect::EMPTY, |bounds, e| bounds.union(&e.bounds()));
    let extent = bounds.width.max(bounds.height);
    if extent.is_finite() {
        1e-9 * extent.max(1.0)
    } else {
        1e-9
    }
}

/// Query geometry prepared for repeated hit tests
///
/// The query is flattened once, in its own coordinate space, at a tolerance
/// that is reused for every drawn geometry it is tested against.
#[derive(Clone, Debug)]
pub struct HitTestQuery {
    region: PreparedRegion,
    tolerance: f64,
}

impl HitTestQuery {
    pub fn new(geometry: &Geometry) -> Self {
        Self::with_tolerance(geometry, Tolerance::default())
    }

    pub fn with_tolerance(geometry: &Geometry, tolerance: Tolerance) -> Self {
        let tolerance = geometry.resolve_tolerance(tolerance);
        let region = PreparedRegion::new(geometry.fill_region(&Matrix::IDENTITY, tolerance));
        Self { region, tolerance }
    }

    /// Absolute flattening tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn bounds(&self) -> Rect {
        self.region.bounds()
    }

    /// True when the query encloses no area and can hit nothing
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    pub fn region(&self) -> &PreparedRegion {
        &self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::Color;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Arc<Geometry> {
        Arc::new(RectangleGeometry::new(Rect::new(x, y, w, h)).into())
    }

    fn query(x: f64, y: f64, w: f64, h: f64) -> HitTestQuery {
        HitTestQuery::new(&rect(x, y, w, h))
    }

    fn assert_rect_near(actual: Rect, expected: Rect) {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
        assert!(
            close(actual.x, expected.x)
                && close(actual.y, expected.y)
                && close(actual.width, expected.width)
                && close(actual.height, expected.height),
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_transformed_copy() {
        let geometry: Geometry = RectangleGeometry::new(Rect::new(0.0, 0.0, 10.0, 10.0))
            .with_transform(Matrix::translation(5.0, 0.0))
            .into();

        let copy = geometry.get_transformed_copy(&Matrix::scale(2.0, 2.0));
        assert_eq!(*copy.transform(), Matrix::translation(5.0, 0.0) * Matrix::scale(2.0, 2.0));
        assert_eq!(copy.bounds(), Rect::new(10.0, 0.0, 20.0, 20.0));
        // the original is untouched
        assert_eq!(geometry.bounds(), Rect::new(5.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_combined_bounds() {
        let union = Geometry::combine(
            rect(0.0, 0.0, 10.0, 10.0),
            rect(5.0, 0.0, 10.0, 10.0),
            GeometryCombineMode::Union,
            None,
        );
        assert_rect_near(union.bounds(), Rect::new(0.0, 0.0, 15.0, 10.0));

        let pen = Pen::new(Color::BLACK, 2.0);
        let stroked = union.get_bounds_internal(Some(&pen), &Matrix::IDENTITY, Tolerance::default());
        assert_rect_near(stroked, Rect::new(-1.0, -1.0, 17.0, 12.0));

        let moved = Geometry::combine(
            rect(0.0, 0.0, 10.0, 10.0),
            rect(5.0, 0.0, 10.0, 10.0),
            GeometryCombineMode::Intersect,
            Some(&Matrix::translation(100.0, 0.0)),
        );
        assert_rect_near(moved.bounds(), Rect::new(105.0, 0.0, 5.0, 10.0));
    }

    #[test]
    fn test_empty_geometries() {
        assert!(Geometry::from(PathGeometry::new()).is_empty());
        assert!(Geometry::from(RectangleGeometry::new(Rect::EMPTY)).is_empty());
        assert!(!Geometry::from(LineGeometry::new(Point::ZERO, Point::ZERO)).is_empty());

        let disjoint = Geometry::combine(
            rect(0.0, 0.0, 10.0, 10.0),
            rect(20.0, 0.0, 10.0, 10.0),
            GeometryCombineMode::Intersect,
            None,
        );
        assert!(disjoint.is_empty());
        assert!(disjoint.bounds().is_empty());
    }

    #[test]
    fn test_fill_contains() {
        let square = rect(0.0, 0.0, 10.0, 10.0);
        assert!(square.fill_contains(Point::new(5.0, 5.0)));
        assert!(square.fill_contains(Point::new(10.0, 10.0)));
        assert!(!square.fill_contains(Point::new(10.5, 5.0)));

        let circle: Geometry = EllipseGeometry::new(Point::new(0.0, 0.0), 10.0, 10.0).into();
        assert!(circle.fill_contains(Point::new(6.0, 6.0)));
        assert!(!circle.fill_contains(Point::new(8.0, 8.0)));

        let line: Geometry = LineGeometry::new(Point::ZERO, Point::new(10.0, 0.0)).into();
        assert!(!line.fill_contains(Point::new(5.0, 1.0)));
    }

    #[test]
    fn test_fill_rule_holes() {
        let ring = PathGeometry::parse("M0,0 L100,0 100,100 0,100 Z M25,25 L75,25 75,75 25,75 Z").unwrap();
        let even_odd: Geometry = ring.clone().into();
        assert!(!even_odd.fill_contains(Point::new(50.0, 50.0)));
        assert!(even_odd.fill_contains(Point::new(10.0, 50.0)));

        let nonzero: Geometry = ring.with_fill_rule(FillRule::Nonzero).into();
        assert!(nonzero.fill_contains(Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_stroke_contains() {
        let line: Geometry = LineGeometry::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).into();
        let pen = Pen::new(Color::BLACK, 2.0);

        assert!(line.stroke_contains(&pen, Point::new(5.0, 0.9)));
        assert!(!line.stroke_contains(&pen, Point::new(5.0, 1.5)));
        assert!(!line.stroke_contains(&pen, Point::new(11.0, 0.0)));
        assert!(!line.stroke_contains(&Pen::new(Color::BLACK, 0.0), Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_fill_contains_with_detail() {
        let square = rect(0.0, 0.0, 100.0, 100.0);

        assert_eq!(
            square.fill_contains_with_detail(&query(10.0, 10.0, 10.0, 10.0)),
            IntersectionDetail::FullyContains
        );
        assert_eq!(
            square.fill_contains_with_detail(&query(-10.0, -10.0, 200.0, 200.0)),
            IntersectionDetail::FullyInside
        );
        assert_eq!(
            square.fill_contains_with_detail(&query(90.0, 90.0, 20.0, 20.0)),
            IntersectionDetail::Intersects
        );
        assert_eq!(
            square.fill_contains_with_detail(&query(200.0, 200.0, 10.0, 10.0)),
            IntersectionDetail::Empty
        );
    }

    #[test]
    fn test_stroke_contains_with_detail() {
        let square = rect(0.0, 0.0, 100.0, 100.0);
        let pen = Pen::new(Color::BLACK, 10.0);

        // inside the band along the top edge
        assert_eq!(
            square.stroke_contains_with_detail(&pen, &query(40.0, -2.0, 10.0, 4.0)),
            IntersectionDetail::FullyContains
        );
        // in the unstroked middle
        assert_eq!(
            square.stroke_contains_with_detail(&pen, &query(40.0, 40.0, 10.0, 10.0)),
            IntersectionDetail::Empty
        );
        assert_eq!(
            square.stroke_contains_with_detail(&Pen::new(Color::BLACK, 0.0), &query(40.0, -2.0, 10.0, 4.0)),
            IntersectionDetail::Empty
        );
    }

    #[test]
    fn test_clipped_geometry_detail() {
        let clipped = Geometry::combine(
            rect(0.0, 0.0, 100.0, 100.0),
            rect(50.0, 0.0, 100.0, 100.0),
            GeometryCombineMode::Intersect,
            None,
        );
        assert_eq!(
            clipped.fill_contains_with_detail(&query(10.0, 10.0, 10.0, 10.0)),
            IntersectionDetail::Empty
        );
        assert_eq!(
            clipped.fill_contains_with_detail(&query(60.0, 10.0, 10.0, 10.0)),
            IntersectionDetail::FullyContains
        );
    }

    #[test]
    fn test_relative_tolerance() {
        let circle: Geometry = EllipseGeometry::new(Point::ZERO, 1000.0, 1000.0).into();
        let coarse = HitTestQuery::with_tolerance(&circle, Tolerance::relative(0.01));
        assert_eq!(coarse.tolerance(), 20.0);
        assert!(!coarse.is_empty());
    }
}
