//! Shared bounds computation over raw figure buffers

use lyon::geom::{point, CubicBezierSegment};
use prism_core::{Matrix, Pen, Point, Rect, Tolerance, ToleranceType};

use crate::flatten::{flatten_figure, pre_transform_tolerance};
use crate::segment::{RawFigure, RawSegment};
use crate::stroke::widen;

/// Bounds of a set of raw figures
///
/// Figures are placed by `geometry_matrix`, stroked with `pen` in that
/// space, and the result is transformed by `world`. Curves contribute their
/// exact extent to the fill bounds; the stroke outline is flattened at
/// `tolerance` measured in world units.
///
/// A NaN coordinate anywhere yields a rect full of NaN so callers can
/// decide how to treat degenerate input.
pub fn bounds_helper(
    pen: Option<&Pen>,
    world: &Matrix,
    figures: &[RawFigure<'_>],
    geometry_matrix: &Matrix,
    tolerance: f64,
    tolerance_type: ToleranceType,
) -> Rect {
    let combined = *geometry_matrix * *world;

    let mut bounds = Rect::EMPTY;
    for figure in figures {
        match fill_bounds(figure, &combined) {
            Some(rect) => bounds = bounds.union(&rect),
            None => return nan_rect(),
        }
    }

    let pen = match pen {
        Some(pen) if Pen::contributes_to_bounds(Some(pen)) => pen,
        _ => return bounds,
    };

    let control = figures.iter().fold(Rect::EMPTY, |acc, figure| {
        acc.union(&figure.control_bounds(&Matrix::IDENTITY))
    });
    let extent = if control.is_empty() {
        0.0
    } else {
        control.width.max(control.height)
    };
    let tolerance = Tolerance {
        value: tolerance,
        kind: tolerance_type,
    }
    .resolve(extent);
    let local_tolerance = pre_transform_tolerance(tolerance, world);

    let mut polygons = Vec::new();
    for figure in figures {
        if let Some(line) = flatten_figure(figure, geometry_matrix, local_tolerance) {
            widen(&line, pen, local_tolerance, &mut polygons);
        }
    }

    for p in polygons.iter().flatten() {
        let p = world.transform_point(*p);
        if p.x.is_nan() || p.y.is_nan() {
            return nan_rect();
        }
        bounds = bounds.union_point(p);
    }

    bounds
}

/// Exact fill extent of one figure, `None` if any point is NaN
fn fill_bounds(figure: &RawFigure<'_>, matrix: &Matrix) -> Option<Rect> {
    if !figure.has_segments() {
        return Some(Rect::EMPTY);
    }

    let mut bounds = Rect::EMPTY;
    for segment in figure.segments() {
        match segment {
            RawSegment::Line { from, to, .. } => {
                for p in [from, to] {
                    bounds = bounds.union_point(finite_or_nan(matrix.transform_point(p))?);
                }
            }
            RawSegment::Bezier {
                from,
                ctrl1,
                ctrl2,
                to,
                ..
            } => {
                let [a, b, c, d] = [from, ctrl1, ctrl2, to].map(|p| matrix.transform_point(p));
                for p in [a, b, c, d] {
                    finite_or_nan(p)?;
                }

                if [a, b, c, d].iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
                    let curve = CubicBezierSegment {
                        from: point(a.x, a.y),
                        ctrl1: point(b.x, b.y),
                        ctrl2: point(c.x, c.y),
                        to: point(d.x, d.y),
                    };
                    let extent = curve.bounding_box();
                    bounds = bounds
                        .union_point(Point::new(extent.min.x, extent.min.y))
                        .union_point(Point::new(extent.max.x, extent.max.y));
                } else {
                    // Infinite control points: the hull is the best we can do
                    for p in [a, b, c, d] {
                        bounds = bounds.union_point(p);
                    }
                }
            }
        }
    }

    Some(bounds)
}

fn finite_or_nan(p: Point) -> Option<Point> {
    if p.x.is_nan() || p.y.is_nan() {
        None
    } else {
        Some(p)
    }
}

pub(crate) fn nan_rect() -> Rect {
    Rect::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN)
}
