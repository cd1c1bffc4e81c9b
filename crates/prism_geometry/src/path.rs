//! Path geometry
//!
//! A `PathGeometry` is a list of figures, each a start point followed by
//! line, Bezier and arc segments. Path data strings are read through
//! [`PathGeometry::parse`].

use prism_core::{Matrix, Point, Size};
use tracing::debug;

use crate::arc::{arc_to_beziers, ArcSegments};
use crate::context::StreamGeometryContext;
use crate::error::ParseError;
use crate::parser;
use crate::segment::{FigureData, SegmentFlags};

/// How overlapping areas of a path are filled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    /// A point is inside when a ray from it crosses an odd number of edges
    #[default]
    EvenOdd,
    /// A point is inside when the winding number around it is non-zero
    Nonzero,
}

/// Direction an arc is drawn in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SweepDirection {
    #[default]
    Counterclockwise,
    Clockwise,
}

/// Segment geometry
#[derive(Clone, Debug, PartialEq)]
pub enum PathSegmentKind {
    Line {
        to: Point,
    },
    QuadraticBezier {
        ctrl: Point,
        to: Point,
    },
    Bezier {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Arc {
        to: Point,
        size: Size,
        /// Degrees
        rotation_angle: f64,
        is_large_arc: bool,
        sweep_direction: SweepDirection,
    },
}

/// One segment of a figure
#[derive(Clone, Debug, PartialEq)]
pub struct PathSegment {
    pub kind: PathSegmentKind,
    pub is_stroked: bool,
    pub is_smooth_join: bool,
}

impl PathSegment {
    pub fn new(kind: PathSegmentKind) -> Self {
        Self {
            kind,
            is_stroked: true,
            is_smooth_join: false,
        }
    }

    pub fn line(to: Point) -> Self {
        Self::new(PathSegmentKind::Line { to })
    }

    pub fn end_point(&self) -> Point {
        match self.kind {
            PathSegmentKind::Line { to }
            | PathSegmentKind::QuadraticBezier { to, .. }
            | PathSegmentKind::Bezier { to, .. }
            | PathSegmentKind::Arc { to, .. } => to,
        }
    }
}

/// Start point plus a run of connected segments
#[derive(Clone, Debug, PartialEq)]
pub struct PathFigure {
    pub start_point: Point,
    pub segments: Vec<PathSegment>,
    pub is_closed: bool,
    pub is_filled: bool,
}

impl PathFigure {
    pub fn new(start_point: Point) -> Self {
        Self {
            start_point,
            segments: Vec::new(),
            is_closed: false,
            is_filled: true,
        }
    }

    /// Current point after the last segment
    pub fn end_point(&self) -> Point {
        self.segments
            .last()
            .map(PathSegment::end_point)
            .unwrap_or(self.start_point)
    }

    /// Lower to a point/flag buffer
    ///
    /// Quadratic segments are elevated to cubics and arcs are split into
    /// cubic pieces.
    pub fn to_figure_data(&self) -> FigureData {
        let mut data = FigureData::new(self.start_point, self.is_filled);
        let mut current = self.start_point;

        for segment in &self.segments {
            let flags = SegmentFlags::empty().with_options(segment.is_stroked, segment.is_smooth_join);

            match segment.kind {
                PathSegmentKind::Line { to } => data.line_to(to, flags),
                PathSegmentKind::QuadraticBezier { ctrl, to } => {
                    let ctrl1 = current + (ctrl - current) * (2.0 / 3.0);
                    let ctrl2 = to + (ctrl - to) * (2.0 / 3.0);
                    data.bezier_to(ctrl1, ctrl2, to, flags | SegmentFlags::CURVED);
                }
                PathSegmentKind::Bezier { ctrl1, ctrl2, to } => {
                    data.bezier_to(ctrl1, ctrl2, to, flags | SegmentFlags::CURVED)
                }
                PathSegmentKind::Arc {
                    to,
                    size,
                    rotation_angle,
                    is_large_arc,
                    sweep_direction,
                } => {
                    let sweep = sweep_direction == SweepDirection::Clockwise;
                    match arc_to_beziers(current, to, size, rotation_angle, is_large_arc, sweep) {
                        ArcSegments::None => {}
                        ArcSegments::Line => data.line_to(to, flags),
                        ArcSegments::Curves(curves) => {
                            for [ctrl1, ctrl2, end] in curves {
                                data.bezier_to(ctrl1, ctrl2, end, flags | SegmentFlags::CURVED);
                            }
                        }
                    }
                }
            }

            current = segment.end_point();
        }

        if self.is_closed {
            data.close();
        }
        data
    }
}

/// Geometry built from figures
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathGeometry {
    pub figures: Vec<PathFigure>,
    pub fill_rule: FillRule,
    pub transform: Matrix,
}

impl PathGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_figures(figures: Vec<PathFigure>, fill_rule: FillRule) -> Self {
        Self {
            figures,
            fill_rule,
            transform: Matrix::IDENTITY,
        }
    }

    /// Parse path mini-language data
    ///
    /// ```rust
    /// use prism_geometry::PathGeometry;
    ///
    /// let path = PathGeometry::parse("M 0,0 L 10,0 10,10 Z").unwrap();
    /// assert_eq!(path.figures.len(), 1);
    /// assert!(path.figures[0].is_closed);
    /// ```
    pub fn parse(data: &str) -> Result<Self, ParseError> {
        let mut builder = PathGeometryBuilder::new();
        parser::parse_path_data(data, &mut builder)?;
        let geometry = builder.build();
        debug!(figures = geometry.figures.len(), "parsed path data");
        Ok(geometry)
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn figure_data(&self) -> Vec<FigureData> {
        self.figures.iter().map(PathFigure::to_figure_data).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fluent construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a new figure
    pub fn move_to(mut self, point: Point) -> Self {
        self.figures.push(PathFigure::new(point));
        self
    }

    pub fn line_to(self, to: Point) -> Self {
        self.push_segment(PathSegmentKind::Line { to })
    }

    pub fn quad_to(self, ctrl: Point, to: Point) -> Self {
        self.push_segment(PathSegmentKind::QuadraticBezier { ctrl, to })
    }

    pub fn cubic_to(self, ctrl1: Point, ctrl2: Point, to: Point) -> Self {
        self.push_segment(PathSegmentKind::Bezier { ctrl1, ctrl2, to })
    }

    pub fn arc_to(
        self,
        to: Point,
        size: Size,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep_direction: SweepDirection,
    ) -> Self {
        self.push_segment(PathSegmentKind::Arc {
            to,
            size,
            rotation_angle,
            is_large_arc,
            sweep_direction,
        })
    }

    /// Close the last figure
    pub fn close(mut self) -> Self {
        if let Some(figure) = self.figures.last_mut() {
            figure.is_closed = true;
        }
        self
    }

    fn push_segment(mut self, kind: PathSegmentKind) -> Self {
        if self.figures.is_empty() {
            self.figures.push(PathFigure::new(Point::ZERO));
        }
        if let Some(figure) = self.figures.last_mut() {
            figure.segments.push(PathSegment::new(kind));
        }
        self
    }
}

/// [`StreamGeometryContext`] that collects figures into a [`PathGeometry`]
#[derive(Debug, Default)]
pub struct PathGeometryBuilder {
    figures: Vec<PathFigure>,
    fill_rule: FillRule,
}

impl PathGeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> PathGeometry {
        PathGeometry::from_figures(self.figures, self.fill_rule)
    }

    fn push(&mut self, kind: PathSegmentKind, is_stroked: bool, is_smooth_join: bool) {
        match self.figures.last_mut() {
            Some(figure) => figure.segments.push(PathSegment {
                kind,
                is_stroked,
                is_smooth_join,
            }),
            None => debug_assert!(false, "segment added before begin_figure"),
        }
    }
}

impl StreamGeometryContext for PathGeometryBuilder {
    fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    fn begin_figure(&mut self, start: Point, is_filled: bool, is_closed: bool) {
        self.figures.push(PathFigure {
            start_point: start,
            segments: Vec::new(),
            is_closed,
            is_filled,
        });
    }

    fn line_to(&mut self, point: Point, is_stroked: bool, is_smooth_join: bool) {
        self.push(PathSegmentKind::Line { to: point }, is_stroked, is_smooth_join);
    }

    fn quadratic_bezier_to(
        &mut self,
        ctrl: Point,
        point: Point,
        is_stroked: bool,
        is_smooth_join: bool,
    ) {
        self.push(
            PathSegmentKind::QuadraticBezier { ctrl, to: point },
            is_stroked,
            is_smooth_join,
        );
    }

    fn bezier_to(
        &mut self,
        ctrl1: Point,
        ctrl2: Point,
        point: Point,
        is_stroked: bool,
        is_smooth_join: bool,
    ) {
        self.push(
            PathSegmentKind::Bezier {
                ctrl1,
                ctrl2,
                to: point,
            },
            is_stroked,
            is_smooth_join,
        );
    }

    fn arc_to(
        &mut self,
        point: Point,
        size: Size,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep_direction: SweepDirection,
        is_stroked: bool,
        is_smooth_join: bool,
    ) {
        self.push(
            PathSegmentKind::Arc {
                to: point,
                size,
                rotation_angle,
                is_large_arc,
                sweep_direction,
            },
            is_stroked,
            is_smooth_join,
        );
    }

    fn set_closed_state(&mut self, closed: bool) {
        if let Some(figure) = self.figures.last_mut() {
            figure.is_closed = closed;
        }
    }
}
