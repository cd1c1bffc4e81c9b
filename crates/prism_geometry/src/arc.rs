//! Elliptical arc to cubic Bezier conversion

use std::f64::consts::{FRAC_PI_2, TAU};

use prism_core::{Point, Size};
use smallvec::SmallVec;

/// Control point distance, as a fraction of the radius, for a quarter
/// circle drawn as one cubic Bezier
#[allow(clippy::excessive_precision)]
pub const ARC_AS_BEZIER: f64 = 0.5522847498307933984;

/// Result of converting an endpoint-parameterised arc
#[derive(Clone, Debug, PartialEq)]
pub enum ArcSegments {
    /// Start and end coincide, nothing is drawn
    None,
    /// A radius is zero, the arc degenerates to a straight line
    Line,
    /// Cubic pieces as `[ctrl1, ctrl2, end]`, each spanning at most 90 degrees
    Curves(SmallVec<[[Point; 3]; 4]>),
}

/// Convert an SVG-style arc into cubic Beziers
///
/// `rotation` is the x-axis rotation of the ellipse in degrees. Radii that
/// are too small to span the endpoints are scaled up uniformly.
pub fn arc_to_beziers(
    from: Point,
    to: Point,
    radii: Size,
    rotation: f64,
    large_arc: bool,
    sweep: bool,
) -> ArcSegments {
    if from == to {
        return ArcSegments::None;
    }

    let mut rx = radii.width.abs();
    let mut ry = radii.height.abs();
    if rx == 0.0 || ry == 0.0 || !rx.is_finite() || !ry.is_finite() {
        return ArcSegments::Line;
    }

    let (sin_phi, cos_phi) = rotation.to_radians().sin_cos();

    // Midpoint in the ellipse's rotated frame
    let dx = (from.x - to.x) / 2.0;
    let dy = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx + sin_phi * dy;
    let y1p = -sin_phi * dx + cos_phi * dy;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rx_sq = rx * rx;
    let ry_sq = ry * ry;
    let numer = (rx_sq * ry_sq - rx_sq * y1p * y1p - ry_sq * x1p * x1p).max(0.0);
    let denom = rx_sq * y1p * y1p + ry_sq * x1p * x1p;
    let mut coef = if denom > 0.0 {
        (numer / denom).sqrt()
    } else {
        0.0
    };
    if large_arc == sweep {
        coef = -coef;
    }

    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let theta1 = uy.atan2(ux);
    let mut dtheta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
    if sweep && dtheta < 0.0 {
        dtheta += TAU;
    } else if !sweep && dtheta > 0.0 {
        dtheta -= TAU;
    }

    let count = ((dtheta.abs() / FRAC_PI_2) - 1e-9).ceil().max(1.0) as usize;
    let step = dtheta / count as f64;
    let alpha = 4.0 / 3.0 * (step / 4.0).tan();

    // Unit circle to ellipse
    let map = |x: f64, y: f64| {
        Point::new(
            cx + cos_phi * rx * x - sin_phi * ry * y,
            cy + sin_phi * rx * x + cos_phi * ry * y,
        )
    };

    let mut curves = SmallVec::new();
    for i in 0..count {
        let t1 = theta1 + step * i as f64;
        let t2 = t1 + step;
        let (s1, c1) = t1.sin_cos();
        let (s2, c2) = t2.sin_cos();

        let ctrl1 = map(c1 - alpha * s1, s1 + alpha * c1);
        let ctrl2 = map(c2 + alpha * s2, s2 - alpha * c2);
        let end = if i + 1 == count { to } else { map(c2, s2) };

        curves.push([ctrl1, ctrl2, end]);
    }

    ArcSegments::Curves(curves)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curves(segments: ArcSegments) -> SmallVec<[[Point; 3]; 4]> {
        match segments {
            ArcSegments::Curves(curves) => curves,
            other => panic!("expected curves, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_arcs() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(
            arc_to_beziers(p, p, Size::new(5.0, 5.0), 0.0, false, true),
            ArcSegments::None
        );
        assert_eq!(
            arc_to_beziers(p, Point::new(9.0, 4.0), Size::new(0.0, 5.0), 0.0, false, true),
            ArcSegments::Line
        );
    }

    #[test]
    fn test_half_circle() {
        let pieces = curves(arc_to_beziers(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Size::new(5.0, 5.0),
            0.0,
            false,
            true,
        ));

        assert_eq!(pieces.len(), 2);
        // Clockwise in a y-down space passes over the top
        let mid = pieces[0][2];
        assert!((mid.x - 5.0).abs() < 1e-9);
        assert!((mid.y + 5.0).abs() < 1e-9);
        assert_eq!(pieces[1][2], Point::new(10.0, 0.0));
    }

    #[test]
    fn test_small_radii_are_scaled() {
        let pieces = curves(arc_to_beziers(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Size::new(1.0, 1.0),
            0.0,
            false,
            false,
        ));

        assert_eq!(pieces.len(), 2);
        let mid = pieces[0][2];
        assert!((mid.x - 5.0).abs() < 1e-9);
        assert!((mid.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_arc_control_points() {
        let pieces = curves(arc_to_beziers(
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Size::new(10.0, 10.0),
            0.0,
            false,
            true,
        ));

        assert_eq!(pieces.len(), 1);
        let k = 0.5522847498307933984 * 10.0;
        let [c1, c2, end] = pieces[0];
        assert!((c1.x - 10.0).abs() < 1e-9 && (c1.y - k).abs() < 1e-9);
        assert!((c2.x - k).abs() < 1e-9 && (c2.y - 10.0).abs() < 1e-9);
        assert_eq!(end, Point::new(0.0, 10.0));
    }

    #[test]
    fn test_rotated_large_arc() {
        let pieces = curves(arc_to_beziers(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Size::new(10.0, 5.0),
            45.0,
            true,
            true,
        ));

        assert!(pieces.len() >= 3);
        assert_eq!(pieces[pieces.len() - 1][2], Point::new(10.0, 0.0));
    }
}
