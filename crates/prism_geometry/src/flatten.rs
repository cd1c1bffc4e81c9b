//! Curve flattening
//!
//! Turns raw figures into polylines with `lyon`'s adaptive Bezier
//! flattening. Polylines keep a per-edge "stroked" flag so gap segments
//! survive into stroking.

use lyon::geom::{point, CubicBezierSegment, LineSegment};
use prism_core::{Matrix, Point, Rect};

use crate::region::Edge;
use crate::segment::{RawFigure, RawSegment};

/// Smallest tolerance handed to the flattener
const MIN_TOLERANCE: f64 = 1e-6;

/// Flattened figure
///
/// `stroked[i]` describes the edge from `points[i]` to `points[i + 1]`.
/// Closed polylines carry their closing edge explicitly, so the last point
/// equals the first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub stroked: Vec<bool>,
    pub closed: bool,
    pub filled: bool,
}

impl Polyline {
    fn start(point: Point, closed: bool, filled: bool) -> Self {
        Self {
            points: vec![point],
            stroked: Vec::new(),
            closed,
            filled,
        }
    }

    /// Append a vertex, dropping zero-length edges
    fn push(&mut self, point: Point, stroked: bool) {
        if self.points.last() == Some(&point) {
            return;
        }
        self.points.push(point);
        self.stroked.push(stroked);
    }

    pub fn edge_count(&self) -> usize {
        self.stroked.len()
    }

    pub fn bounds(&self) -> Rect {
        self.points
            .iter()
            .fold(Rect::EMPTY, |bounds, p| bounds.union_point(*p))
    }

    /// Vertices of the implicitly closed fill contour
    pub fn contour(&self) -> &[Point] {
        match self.points.split_last() {
            Some((last, rest)) if self.closed && Some(last) == self.points.first() => rest,
            _ => &self.points,
        }
    }
}

/// Flatten one figure after transforming it by `matrix`
///
/// Returns `None` for figures without segments.
pub fn flatten_figure(figure: &RawFigure<'_>, matrix: &Matrix, tolerance: f64) -> Option<Polyline> {
    if !figure.has_segments() {
        return None;
    }

    let start = matrix.transform_point(figure.start()?);
    let mut line = Polyline::start(start, figure.is_closed(), figure.filled);
    let tolerance = tolerance.max(MIN_TOLERANCE);

    for segment in figure.segments() {
        let stroked = !segment.flags().is_gap();

        match segment {
            RawSegment::Line { to, .. } => line.push(matrix.transform_point(to), stroked),
            RawSegment::Bezier {
                from,
                ctrl1,
                ctrl2,
                to,
                ..
            } => {
                let pts = [from, ctrl1, ctrl2, to].map(|p| matrix.transform_point(p));
                if pts.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                    line.push(pts[3], stroked);
                    continue;
                }

                let curve = CubicBezierSegment {
                    from: to_lyon(pts[0]),
                    ctrl1: to_lyon(pts[1]),
                    ctrl2: to_lyon(pts[2]),
                    to: to_lyon(pts[3]),
                };
                curve.for_each_flattened(tolerance, &mut |seg: &LineSegment<f64>| {
                    line.push(from_lyon(seg.to), stroked);
                });
            }
        }
    }

    if line.closed && line.points.last() != Some(&start) {
        line.points.push(start);
        line.stroked.push(true);
    }

    // Everything collapsed onto the start point; keep one zero-length edge
    // so caps can still be drawn.
    if line.points.len() == 1 {
        line.points.push(start);
        line.stroked.push(true);
    }

    Some(line)
}

pub fn flatten_figures<'a>(
    figures: impl IntoIterator<Item = RawFigure<'a>>,
    matrix: &Matrix,
    tolerance: f64,
) -> Vec<Polyline> {
    figures
        .into_iter()
        .filter_map(|figure| flatten_figure(&figure, matrix, tolerance))
        .collect()
}

/// Link loose edges into polylines by matching endpoints
pub fn chain_edges(edges: &[Edge], epsilon: f64) -> Vec<Polyline> {
    let near = |a: Point, b: Point| (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon;
    let mut used = vec![false; edges.len()];
    let mut lines = Vec::new();

    for i in 0..edges.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut points = vec![edges[i].from, edges[i].to];

        // Extend forwards, then backwards
        for forward in [true, false] {
            loop {
                let end = if forward {
                    points[points.len() - 1]
                } else {
                    points[0]
                };

                let next = edges.iter().enumerate().find_map(|(j, edge)| {
                    if used[j] {
                        None
                    } else if near(edge.from, end) {
                        Some((j, edge.to))
                    } else if near(edge.to, end) {
                        Some((j, edge.from))
                    } else {
                        None
                    }
                });

                match next {
                    Some((j, point)) => {
                        used[j] = true;
                        if forward {
                            points.push(point);
                        } else {
                            points.insert(0, point);
                        }
                    }
                    None => break,
                }
            }
        }

        let closed = points.len() > 2 && near(points[0], points[points.len() - 1]);
        if closed {
            let first = points[0];
            let last = points.len() - 1;
            points[last] = first;
        }

        lines.push(Polyline {
            stroked: vec![true; points.len() - 1],
            points,
            closed,
            filled: true,
        });
    }

    lines
}

/// Largest axis scale of a matrix
pub(crate) fn max_scale(matrix: &Matrix) -> f64 {
    let sx = (matrix.m11 * matrix.m11 + matrix.m12 * matrix.m12).sqrt();
    let sy = (matrix.m21 * matrix.m21 + matrix.m22 * matrix.m22).sqrt();
    sx.max(sy)
}

/// Tolerance to use before `world` is applied so the result meets
/// `tolerance` after it
pub(crate) fn pre_transform_tolerance(tolerance: f64, world: &Matrix) -> f64 {
    let scale = max_scale(world);
    if scale > 0.0 && scale.is_finite() {
        tolerance / scale
    } else {
        tolerance
    }
}

fn to_lyon(p: Point) -> lyon::geom::Point<f64> {
    point(p.x, p.y)
}

fn from_lyon(p: lyon::geom::Point<f64>) -> Point {
    Point::new(p.x, p.y)
}
