//! Figure-building sink
//!
//! The path parser and anything else that produces figures incrementally
//! talks to a [`StreamGeometryContext`]. Poly variants default to looping
//! over the single-segment calls.

use prism_core::{Point, Size};

use crate::path::{FillRule, SweepDirection};

/// Receives figures one call at a time
pub trait StreamGeometryContext {
    /// Fill rule for the geometry being built
    fn set_fill_rule(&mut self, fill_rule: FillRule);

    /// Start a new figure at `start`
    fn begin_figure(&mut self, start: Point, is_filled: bool, is_closed: bool);

    fn line_to(&mut self, point: Point, is_stroked: bool, is_smooth_join: bool);

    fn quadratic_bezier_to(
        &mut self,
        ctrl: Point,
        point: Point,
        is_stroked: bool,
        is_smooth_join: bool,
    );

    fn bezier_to(
        &mut self,
        ctrl1: Point,
        ctrl2: Point,
        point: Point,
        is_stroked: bool,
        is_smooth_join: bool,
    );

    /// Elliptical arc to `point`, `rotation_angle` in degrees
    #[allow(clippy::too_many_arguments)]
    fn arc_to(
        &mut self,
        point: Point,
        size: Size,
        rotation_angle: f64,
        is_large_arc: bool,
        sweep_direction: SweepDirection,
        is_stroked: bool,
        is_smooth_join: bool,
    );

    /// Close or reopen the current figure
    fn set_closed_state(&mut self, closed: bool);

    fn poly_line_to(&mut self, points: &[Point], is_stroked: bool, is_smooth_join: bool) {
        for point in points {
            self.line_to(*point, is_stroked, is_smooth_join);
        }
    }

    /// Quadratic segments as `[ctrl, end]` pairs; a trailing partial pair is ignored
    fn poly_quadratic_bezier_to(&mut self, points: &[Point], is_stroked: bool, is_smooth_join: bool) {
        for pair in points.chunks_exact(2) {
            self.quadratic_bezier_to(pair[0], pair[1], is_stroked, is_smooth_join);
        }
    }

    /// Cubic segments as `[ctrl1, ctrl2, end]` triples; a trailing partial triple is ignored
    fn poly_bezier_to(&mut self, points: &[Point], is_stroked: bool, is_smooth_join: bool) {
        for triple in points.chunks_exact(3) {
            self.bezier_to(triple[0], triple[1], triple[2], is_stroked, is_smooth_join);
        }
    }
}
