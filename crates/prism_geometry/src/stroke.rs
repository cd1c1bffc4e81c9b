//! Stroke outlining
//!
//! A stroked polyline becomes a set of small polygons whose union is the
//! painted band: one quad per edge plus join and cap pieces. Every polygon
//! is emitted with positive signed area so the union can be evaluated with
//! the non-zero rule.

use std::f64::consts::{PI, TAU};

use prism_core::{Pen, PenLineCap, PenLineJoin, Point, Vector};

use crate::flatten::Polyline;

/// Guard against dash patterns that would explode into millions of pieces
const MAX_DASHES: f64 = 100_000.0;

/// Append the outline polygons of `line` stroked with `pen`
///
/// `tolerance` bounds the error of round joins and caps.
pub fn widen(line: &Polyline, pen: &Pen, tolerance: f64, out: &mut Vec<Vec<Point>>) {
    let half = pen.half_thickness();
    if half == 0.0 || !half.is_finite() || line.points.len() < 2 {
        return;
    }

    let mut stroker = Stroker {
        pen,
        half,
        arc_step: arc_step(half, tolerance),
        out,
    };

    for run in stroked_runs(line) {
        match dash_pattern(pen) {
            Some(pattern) => {
                for piece in dash_run(&run, pen, &pattern) {
                    stroker.piece(&piece);
                }
            }
            None => stroker.piece(&Piece {
                start_cap: pen.start_line_cap,
                end_cap: pen.end_line_cap,
                direction: initial_direction(&run.points),
                points: run.points,
                closed: run.closed,
            }),
        }
    }
}

/// Angular step giving round pieces at most `tolerance` of chord error
///
/// A full circle uses a multiple of four steps, between 4 and 64.
fn arc_step(radius: f64, tolerance: f64) -> f64 {
    let raw = if tolerance > 0.0 && tolerance < radius {
        2.0 * (1.0 - tolerance / radius).acos()
    } else {
        PI / 2.0
    };

    let mut count = (TAU / raw).ceil();
    if !count.is_finite() {
        count = 64.0;
    }
    let count = ((count / 4.0).ceil() * 4.0).clamp(4.0, 64.0);
    TAU / count
}

// ─────────────────────────────────────────────────────────────────────────────
// Runs and dashes
// ─────────────────────────────────────────────────────────────────────────────

/// Maximal sequence of stroked edges
struct Run {
    points: Vec<Point>,
    closed: bool,
}

fn stroked_runs(line: &Polyline) -> Vec<Run> {
    let edges = line.edge_count();
    if edges == 0 {
        return Vec::new();
    }

    if line.closed && line.stroked.iter().all(|s| *s) {
        return vec![Run {
            points: line.points.clone(),
            closed: true,
        }];
    }

    // A closed loop with gaps starts walking right after one so a run that
    // wraps around the seam stays in one piece.
    let first = if line.closed {
        line.stroked
            .iter()
            .position(|s| !*s)
            .map_or(0, |gap| gap + 1)
    } else {
        0
    };

    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for k in 0..edges {
        let e = (first + k) % edges;
        if line.stroked[e] {
            if current.is_empty() {
                current.push(line.points[e]);
            }
            current.push(line.points[e + 1]);
        } else if !current.is_empty() {
            runs.push(Run {
                points: std::mem::take(&mut current),
                closed: false,
            });
        }
    }
    if !current.is_empty() {
        runs.push(Run {
            points: current,
            closed: false,
        });
    }

    runs
}

/// Dash and gap lengths in user units, `None` for a solid stroke
fn dash_pattern(pen: &Pen) -> Option<Vec<f64>> {
    let style = pen.dash_style.as_ref()?;
    if !style.has_gaps() {
        return None;
    }

    let thickness = pen.thickness.abs();
    let pattern: Vec<f64> = style.dashes.iter().map(|d| d.abs() * thickness).collect();
    let total: f64 = pattern.iter().sum();
    if total > 0.0 && total.is_finite() {
        Some(pattern)
    } else {
        None
    }
}

/// Stroked sub-path with its own end caps
struct Piece {
    points: Vec<Point>,
    closed: bool,
    start_cap: PenLineCap,
    end_cap: PenLineCap,
    /// Fallback direction for zero-length pieces
    direction: Vector,
}

fn initial_direction(points: &[Point]) -> Vector {
    points
        .windows(2)
        .map(|w| w[1] - w[0])
        .find(|d| d.length_squared() > 0.0)
        .map_or(Vector::new(1.0, 0.0), |d| d.normalize())
}

fn dash_run(run: &Run, pen: &Pen, pattern: &[f64]) -> Vec<Piece> {
    let total: f64 = pattern.iter().sum();
    let length: f64 = run.points.windows(2).map(|w| w[0].distance(w[1])).sum();

    let (start_cap, end_cap) = if run.closed {
        (pen.dash_cap, pen.dash_cap)
    } else {
        (pen.start_line_cap, pen.end_line_cap)
    };

    if length / total > MAX_DASHES {
        return vec![Piece {
            points: run.points.clone(),
            closed: run.closed,
            start_cap,
            end_cap,
            direction: initial_direction(&run.points),
        }];
    }

    // Position in the pattern at the start of the run
    let thickness = pen.thickness.abs();
    let offset = pen
        .dash_style
        .as_ref()
        .map_or(0.0, |style| style.offset * thickness);
    let mut offset = if offset.is_finite() {
        offset.rem_euclid(total)
    } else {
        0.0
    };

    let mut index = 0;
    let mut remaining = pattern[0];
    let mut on = true;
    while offset > 0.0 {
        if offset >= remaining {
            offset -= remaining;
            index = (index + 1) % pattern.len();
            remaining = pattern[index];
            on = !on;
        } else {
            remaining -= offset;
            offset = 0.0;
        }
    }

    let mut pieces = Vec::new();
    let mut current = if on {
        Some(Piece {
            points: vec![run.points[0]],
            closed: false,
            start_cap,
            end_cap: pen.dash_cap,
            direction: initial_direction(&run.points),
        })
    } else {
        None
    };

    for w in run.points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let edge = b - a;
        let len = edge.length();
        if len == 0.0 {
            continue;
        }
        let dir = edge * (1.0 / len);
        let mut t = 0.0;

        loop {
            let left = len - t;
            if remaining > left {
                if let Some(piece) = current.as_mut() {
                    piece.points.push(b);
                }
                remaining -= left;
                break;
            }

            t += remaining;
            let p = a + dir * t;
            if let Some(mut piece) = current.take() {
                piece.points.push(p);
                piece.end_cap = pen.dash_cap;
                pieces.push(piece);
            } else {
                current = Some(Piece {
                    points: vec![p],
                    closed: false,
                    start_cap: pen.dash_cap,
                    end_cap: pen.dash_cap,
                    direction: dir,
                });
            }

            index = (index + 1) % pattern.len();
            remaining = pattern[index];
        }
    }

    if let Some(mut piece) = current {
        piece.end_cap = end_cap;
        pieces.push(piece);
    }

    pieces
}

// ─────────────────────────────────────────────────────────────────────────────
// Outline pieces
// ─────────────────────────────────────────────────────────────────────────────

struct Stroker<'a> {
    pen: &'a Pen,
    half: f64,
    arc_step: f64,
    out: &'a mut Vec<Vec<Point>>,
}

impl Stroker<'_> {
    fn piece(&mut self, piece: &Piece) {
        let mut points: Vec<Point> = Vec::with_capacity(piece.points.len());
        for p in &piece.points {
            if points.last() != Some(p) {
                points.push(*p);
            }
        }

        if piece.closed && points.len() > 2 && points.first() == points.last() {
            points.pop();
        }

        if points.len() == 1 {
            let at = points[0];
            self.cap(at, -piece.direction, piece.start_cap);
            self.cap(at, piece.direction, piece.end_cap);
            return;
        }

        let n = points.len();
        let edges = if piece.closed { n } else { n - 1 };
        for i in 0..edges {
            self.quad(points[i], points[(i + 1) % n]);
        }

        if piece.closed {
            for i in 0..n {
                let prev = points[(i + n - 1) % n];
                let next = points[(i + 1) % n];
                self.join(points[i], points[i] - prev, next - points[i]);
            }
        } else {
            for i in 1..n - 1 {
                self.join(points[i], points[i] - points[i - 1], points[i + 1] - points[i]);
            }
            self.cap(points[0], (points[0] - points[1]).normalize(), piece.start_cap);
            self.cap(
                points[n - 1],
                (points[n - 1] - points[n - 2]).normalize(),
                piece.end_cap,
            );
        }
    }

    fn quad(&mut self, a: Point, b: Point) {
        let n = (b - a).normalize().perpendicular() * self.half;
        self.emit(vec![a + n, b + n, b - n, a - n]);
    }

    /// Join at `v` between an incoming and an outgoing edge direction
    fn join(&mut self, v: Point, incoming: Vector, outgoing: Vector) {
        let d1 = incoming.normalize();
        let d2 = outgoing.normalize();
        let cross = d1.cross(d2);
        let dot = d1.dot(d2);
        if cross.abs() < 1e-12 && dot > 0.0 {
            return;
        }

        // Offsets on the outer side of the turn
        let side = if cross > 0.0 { -self.half } else { self.half };
        let n1 = d1.perpendicular() * side;
        let n2 = d2.perpendicular() * side;
        let p1 = v + n1;
        let p2 = v + n2;

        match self.pen.line_join {
            PenLineJoin::Bevel => self.emit(vec![v, p1, p2]),
            PenLineJoin::Round => self.wedge(v, n1, n2),
            PenLineJoin::Miter => {
                let bisector = n1 + n2;
                let len = bisector.length();
                if len < 1e-12 * self.half {
                    return;
                }

                let cos_half = len / (2.0 * self.half);
                let u = bisector * (1.0 / len);
                let limit = self.pen.miter_limit.max(1.0);

                if 1.0 / cos_half <= limit {
                    let tip = v + u * (self.half / cos_half);
                    self.emit(vec![v, p1, tip, p2]);
                } else {
                    // Clip the miter at `limit` half-thicknesses from the vertex
                    let sin_half = d1.dot(u);
                    let t = (limit * self.half - self.half * cos_half) / sin_half;
                    if t > 0.0 && t.is_finite() {
                        self.emit(vec![v, p1, p1 + d1 * t, p2 - d2 * t, p2]);
                    } else {
                        self.emit(vec![v, p1, p2]);
                    }
                }
            }
        }
    }

    /// Cap at `at` extending along the unit vector `outward`
    fn cap(&mut self, at: Point, outward: Vector, cap: PenLineCap) {
        let n = outward.perpendicular() * self.half;
        let o = outward * self.half;

        match cap {
            PenLineCap::Flat => {}
            PenLineCap::Square => self.emit(vec![at + n, at - n, at - n + o, at + n + o]),
            PenLineCap::Triangle => self.emit(vec![at + n, at - n, at + o]),
            PenLineCap::Round => self.wedge(at, n, -n),
        }
    }

    /// Circular sector around `center` from offset `from` to offset `to`
    ///
    /// Opposite offsets sweep clockwise through `from` rotated by -90 degrees.
    fn wedge(&mut self, center: Point, from: Vector, to: Vector) {
        let mut angle = from.cross(to).atan2(from.dot(to));
        if from.cross(to).abs() < 1e-12 && from.dot(to) < 0.0 {
            angle = -PI;
        }

        // Even step count keeps the sector's middle direction on a vertex
        let steps = (angle.abs() / self.arc_step - 1e-9).ceil().max(1.0) as usize;
        let steps = steps + steps % 2;
        let mut polygon = Vec::with_capacity(steps + 2);
        polygon.push(center);
        for i in 0..=steps {
            let a = angle * i as f64 / steps as f64;
            polygon.push(center + rotate(from, a));
        }
        self.emit(polygon);
    }

    fn emit(&mut self, mut polygon: Vec<Point>) {
        if signed_area(&polygon) < 0.0 {
            polygon.reverse();
        }
        self.out.push(polygon);
    }
}

fn rotate(v: Vector, angle: f64) -> Vector {
    let (s, c) = angle.sin_cos();
    Vector::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Shoelace area, positive for counter-clockwise in a y-up frame
pub(crate) fn signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}
