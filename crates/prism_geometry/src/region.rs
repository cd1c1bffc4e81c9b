//! Planar regions
//!
//! A [`Region`] is a filled area described by flattened contours under a
//! fill rule, or a boolean combination of two regions. Point membership is
//! exact for the flattened contours. Boundaries of combined regions are
//! computed by splitting every edge at its crossings and keeping the pieces
//! that separate inside from outside.

use std::collections::HashSet;

use prism_core::{IntersectionDetail, Point, Rect, Vector};

use crate::geometry::GeometryCombineMode;
use crate::path::FillRule;

/// Straight boundary segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub from: Point,
    pub to: Point,
}

impl Edge {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    pub fn vector(&self) -> Vector {
        self.to - self.from
    }

    pub fn midpoint(&self) -> Point {
        self.from.lerp(self.to, 0.5)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.from, self.to)
    }

    fn point_at(&self, t: f64) -> Point {
        self.from.lerp(self.to, t)
    }

    fn distance_to(&self, p: Point) -> f64 {
        let d = self.vector();
        let len2 = d.length_squared();
        if len2 == 0.0 {
            return p.distance(self.from);
        }
        let t = ((p - self.from).dot(d) / len2).clamp(0.0, 1.0);
        p.distance(self.point_at(t))
    }
}

/// Filled area in device space
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    /// Implicitly closed contours under a fill rule
    Polygons {
        contours: Vec<Vec<Point>>,
        fill_rule: FillRule,
        bbox: Rect,
    },
    /// Boolean combination of two regions
    Combined {
        mode: GeometryCombineMode,
        first: Box<Region>,
        second: Box<Region>,
    },
}

impl Region {
    pub fn polygons(contours: Vec<Vec<Point>>, fill_rule: FillRule) -> Self {
        let contours: Vec<Vec<Point>> = contours.into_iter().filter(|c| c.len() >= 2).collect();
        let bbox = contours
            .iter()
            .flatten()
            .fold(Rect::EMPTY, |bounds, p| bounds.union_point(*p));

        Region::Polygons {
            contours,
            fill_rule,
            bbox,
        }
    }

    pub fn combined(mode: GeometryCombineMode, first: Region, second: Region) -> Self {
        Region::Combined {
            mode,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Strict interior test; points exactly on an edge may go either way
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Region::Polygons {
                contours,
                fill_rule,
                bbox,
            } => {
                if !bbox.contains(p) {
                    return false;
                }
                let winding: i32 = contours.iter().map(|c| winding_number(c, p)).sum();
                match fill_rule {
                    FillRule::EvenOdd => winding % 2 != 0,
                    FillRule::Nonzero => winding != 0,
                }
            }
            Region::Combined {
                mode,
                first,
                second,
            } => {
                let a = first.contains(p);
                match mode {
                    GeometryCombineMode::Union => a || second.contains(p),
                    GeometryCombineMode::Intersect => a && second.contains(p),
                    GeometryCombineMode::Xor => a != second.contains(p),
                    GeometryCombineMode::Exclude => a && !second.contains(p),
                }
            }
        }
    }

    /// Conservative bounds
    pub fn bounds(&self) -> Rect {
        match self {
            Region::Polygons { bbox, .. } => *bbox,
            Region::Combined {
                mode,
                first,
                second,
            } => match mode {
                GeometryCombineMode::Union | GeometryCombineMode::Xor => {
                    first.bounds().union(&second.bounds())
                }
                GeometryCombineMode::Intersect => first.bounds().intersect(&second.bounds()),
                GeometryCombineMode::Exclude => first.bounds(),
            },
        }
    }

    /// Every contour edge of every leaf region
    pub fn collect_edges(&self, out: &mut Vec<Edge>) {
        match self {
            Region::Polygons { contours, .. } => {
                for contour in contours {
                    let n = contour.len();
                    for i in 0..n {
                        let edge = Edge::new(contour[i], contour[(i + 1) % n]);
                        if edge.from != edge.to {
                            out.push(edge);
                        }
                    }
                }
            }
            Region::Combined { first, second, .. } => {
                first.collect_edges(out);
                second.collect_edges(out);
            }
        }
    }

    /// Edges separating the inside of the region from the outside
    pub fn boundary(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        self.collect_edges(&mut edges);
        if edges.is_empty() {
            return edges;
        }

        let bounds = edges
            .iter()
            .fold(Rect::EMPTY, |bounds, e| bounds.union(&e.bounds()));
        let extent = bounds.width.max(bounds.height);
        let scale = if extent.is_finite() { extent.max(1.0) } else { 1.0 };
        let nudge = 1e-7 * scale;
        let min_length = 1e-10 * scale;

        let splits = split_parameters(&edges, 1e-12 * scale);

        let mut seen = HashSet::new();
        let mut boundary = Vec::new();
        for (edge, mut params) in edges.iter().zip(splits) {
            params.push(0.0);
            params.push(1.0);
            params.sort_by(f64::total_cmp);
            params.dedup();

            for w in params.windows(2) {
                let piece = Edge::new(edge.point_at(w[0]), edge.point_at(w[1]));
                let d = piece.vector();
                if d.length() <= min_length {
                    continue;
                }

                let mid = piece.midpoint();
                let n = d.normalize().perpendicular() * nudge;
                if self.contains(mid + n) == self.contains(mid - n) {
                    continue;
                }

                if seen.insert(piece_key(&piece, nudge * 10.0)) {
                    boundary.push(piece);
                }
            }
        }

        boundary
    }
}

/// Winding number of a closed contour around `p`
fn winding_number(contour: &[Point], p: Point) -> i32 {
    let n = contour.len();
    let mut winding = 0;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        let side = (b - a).cross(p - a);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Orientation-independent quantized key for deduplicating boundary pieces
fn piece_key(edge: &Edge, quantum: f64) -> [i64; 4] {
    let q = |v: f64| (v / quantum).round() as i64;
    let a = [q(edge.from.x), q(edge.from.y)];
    let b = [q(edge.to.x), q(edge.to.y)];
    if a <= b {
        [a[0], a[1], b[0], b[1]]
    } else {
        [b[0], b[1], a[0], a[1]]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Segment crossings
// ─────────────────────────────────────────────────────────────────────────────

/// Where two segments meet, as parameters along each
enum Crossing {
    None,
    Point(f64, f64),
    /// Collinear overlap: parameters of the other segment's endpoints
    /// projected onto each segment
    Overlap([f64; 2], [f64; 2]),
}

fn crossing(a: &Edge, b: &Edge, snap: f64) -> Crossing {
    let r = a.vector();
    let s = b.vector();
    let qp = b.from - a.from;
    let denom = r.cross(s);
    let (rl, sl) = (r.length(), s.length());
    if rl == 0.0 || sl == 0.0 {
        return Crossing::None;
    }

    if denom.abs() > 1e-12 * rl * sl {
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        let slack_t = snap / rl;
        let slack_u = snap / sl;
        if (-slack_t..=1.0 + slack_t).contains(&t) && (-slack_u..=1.0 + slack_u).contains(&u) {
            return Crossing::Point(t.clamp(0.0, 1.0), u.clamp(0.0, 1.0));
        }
        return Crossing::None;
    }

    // Parallel: only collinear segments can share points
    if (qp.cross(r) / rl).abs() > snap {
        return Crossing::None;
    }

    let r2 = rl * rl;
    let s2 = sl * sl;
    let on_a = [qp.dot(r) / r2, (b.to - a.from).dot(r) / r2];
    let on_b = [(a.from - b.from).dot(s) / s2, (a.to - b.from).dot(s) / s2];

    let (lo, hi) = (on_a[0].min(on_a[1]), on_a[0].max(on_a[1]));
    if hi < -snap / rl || lo > 1.0 + snap / rl {
        return Crossing::None;
    }

    Crossing::Overlap(on_a, on_b)
}

/// Parameters at which each edge must be split so no two pieces cross
fn split_parameters(edges: &[Edge], snap: f64) -> Vec<Vec<f64>> {
    let mut splits = vec![Vec::new(); edges.len()];
    let inner = |t: f64| t > 0.0 && t < 1.0;

    for_each_candidate_pair(edges, edges, true, |i, j| {
        match crossing(&edges[i], &edges[j], snap) {
            Crossing::None => {}
            Crossing::Point(t, u) => {
                if inner(t) {
                    splits[i].push(t);
                }
                if inner(u) {
                    splits[j].push(u);
                }
            }
            Crossing::Overlap(on_i, on_j) => {
                splits[i].extend(on_i.into_iter().filter(|t| inner(*t)));
                splits[j].extend(on_j.into_iter().filter(|t| inner(*t)));
            }
        }
        false
    });

    splits
}

/// Visit index pairs whose bounding boxes overlap, sweeping along x
///
/// With `same` set both slices are the same and each unordered pair is
/// visited once. Returns early when `visit` returns true.
fn for_each_candidate_pair(
    a: &[Edge],
    b: &[Edge],
    same: bool,
    mut visit: impl FnMut(usize, usize) -> bool,
) -> bool {
    let boxes_a: Vec<Rect> = a.iter().map(Edge::bounds).collect();
    let boxes_b: Vec<Rect> = b.iter().map(Edge::bounds).collect();

    let mut order_b: Vec<usize> = (0..b.len()).collect();
    order_b.sort_by(|&x, &y| boxes_b[x].left().total_cmp(&boxes_b[y].left()));

    for (i, box_a) in boxes_a.iter().enumerate() {
        for &j in &order_b {
            let box_b = &boxes_b[j];
            if box_b.left() > box_a.right() {
                break;
            }
            if same && j <= i {
                continue;
            }
            if box_a.intersects_with(box_b) && visit(i, j) {
                return true;
            }
        }
    }

    false
}

// ─────────────────────────────────────────────────────────────────────────────
// Prepared regions
// ─────────────────────────────────────────────────────────────────────────────

/// Region with its boundary computed up front for repeated queries
#[derive(Clone, Debug)]
pub struct PreparedRegion {
    region: Region,
    boundary: Vec<Edge>,
    bbox: Rect,
}

impl PreparedRegion {
    pub fn new(region: Region) -> Self {
        let boundary = region.boundary();
        let bbox = boundary
            .iter()
            .fold(Rect::EMPTY, |bounds, e| bounds.union(&e.bounds()));

        Self {
            region,
            boundary,
            bbox,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn boundary(&self) -> &[Edge] {
        &self.boundary
    }

    /// Bounds of the boundary, [`Rect::EMPTY`] for a region with no area
    pub fn bounds(&self) -> Rect {
        self.bbox
    }

    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty()
    }

    fn snap(&self) -> f64 {
        let extent = self.bbox.width.max(self.bbox.height);
        if extent.is_finite() {
            1e-9 * extent.max(1.0)
        } else {
            1e-9
        }
    }

    /// Whether `p` lies inside the region or on its boundary
    pub fn contains_point(&self, p: Point) -> bool {
        if self.is_empty() {
            return false;
        }

        let snap = self.snap();
        if !self.bbox.inflate(snap, snap).contains(p) {
            return false;
        }

        self.region.contains(p) || self.boundary.iter().any(|e| e.distance_to(p) <= snap)
    }

    /// How `query` relates to this region
    pub fn relate(&self, query: &PreparedRegion) -> IntersectionDetail {
        if self.is_empty() || query.is_empty() {
            return IntersectionDetail::Empty;
        }
        if !self.bbox.intersects_with(&query.bbox) {
            return IntersectionDetail::Empty;
        }

        let snap = self.snap().max(query.snap());
        let touching = for_each_candidate_pair(&self.boundary, &query.boundary, false, |i, j| {
            !matches!(
                crossing(&self.boundary[i], &query.boundary[j], snap),
                Crossing::None
            )
        });
        if touching {
            return IntersectionDetail::Intersects;
        }

        // Without crossings each boundary lies wholly inside or outside the
        // other region, one piece at a time.
        let query_inside = query
            .boundary
            .iter()
            .filter(|e| self.region.contains(e.midpoint()))
            .count();
        let drawn_inside = self
            .boundary
            .iter()
            .filter(|e| query.region.contains(e.midpoint()))
            .count();

        if query_inside == query.boundary.len() && drawn_inside == 0 {
            IntersectionDetail::FullyContains
        } else if drawn_inside == self.boundary.len() && query_inside == 0 {
            IntersectionDetail::FullyInside
        } else if query_inside == 0 && drawn_inside == 0 {
            IntersectionDetail::Empty
        } else {
            IntersectionDetail::Intersects
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    fn rect_region(x: f64, y: f64, size: f64) -> Region {
        Region::polygons(vec![square(x, y, size)], FillRule::Nonzero)
    }

    fn boundary_length(region: &Region) -> f64 {
        region.boundary().iter().map(|e| e.vector().length()).sum()
    }

    #[test]
    fn test_contains_fill_rules() {
        let contours = vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 6.0)];

        let even_odd = Region::polygons(contours.clone(), FillRule::EvenOdd);
        assert!(even_odd.contains(Point::new(1.0, 1.0)));
        assert!(!even_odd.contains(Point::new(5.0, 5.0)));

        let nonzero = Region::polygons(contours, FillRule::Nonzero);
        assert!(nonzero.contains(Point::new(5.0, 5.0)));
        assert!(!nonzero.contains(Point::new(15.0, 5.0)));
    }

    #[test]
    fn test_combine_modes() {
        let a = || rect_region(0.0, 0.0, 10.0);
        let b = || rect_region(5.0, 0.0, 10.0);
        let left = Point::new(2.0, 5.0);
        let middle = Point::new(7.0, 5.0);
        let right = Point::new(12.0, 5.0);

        let union = Region::combined(GeometryCombineMode::Union, a(), b());
        assert!(union.contains(left) && union.contains(middle) && union.contains(right));

        let intersect = Region::combined(GeometryCombineMode::Intersect, a(), b());
        assert!(!intersect.contains(left) && intersect.contains(middle));
        assert_eq!(intersect.bounds(), Rect::new(5.0, 0.0, 5.0, 10.0));

        let xor = Region::combined(GeometryCombineMode::Xor, a(), b());
        assert!(xor.contains(left) && !xor.contains(middle) && xor.contains(right));

        let exclude = Region::combined(GeometryCombineMode::Exclude, a(), b());
        assert!(exclude.contains(left) && !exclude.contains(middle) && !exclude.contains(right));
        assert_eq!(exclude.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_boundary_of_union() {
        let union = Region::combined(
            GeometryCombineMode::Union,
            rect_region(0.0, 0.0, 10.0),
            rect_region(5.0, 0.0, 10.0),
        );
        assert!((boundary_length(&union) - 50.0).abs() < 1e-6);

        let intersect = Region::combined(
            GeometryCombineMode::Intersect,
            rect_region(0.0, 0.0, 10.0),
            rect_region(5.0, 0.0, 10.0),
        );
        assert!((boundary_length(&intersect) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let region = PreparedRegion::new(Region::combined(
            GeometryCombineMode::Intersect,
            rect_region(0.0, 0.0, 10.0),
            rect_region(20.0, 0.0, 10.0),
        ));
        assert!(region.is_empty());
        assert!(region.bounds().is_empty());
    }

    #[test]
    fn test_contains_point_includes_edges() {
        let region = PreparedRegion::new(rect_region(0.0, 0.0, 10.0));
        assert!(region.contains_point(Point::new(10.0, 5.0)));
        assert!(region.contains_point(Point::new(0.0, 0.0)));
        assert!(region.contains_point(Point::new(5.0, 5.0)));
        assert!(!region.contains_point(Point::new(10.5, 5.0)));
    }

    #[test]
    fn test_relate() {
        let drawn = PreparedRegion::new(rect_region(0.0, 0.0, 100.0));
        let relate = |x: f64, y: f64, size: f64| drawn.relate(&PreparedRegion::new(rect_region(x, y, size)));

        assert_eq!(relate(10.0, 10.0, 10.0), IntersectionDetail::FullyContains);
        assert_eq!(relate(-10.0, -10.0, 200.0), IntersectionDetail::FullyInside);
        assert_eq!(relate(200.0, 0.0, 10.0), IntersectionDetail::Empty);
        assert_eq!(relate(95.0, 95.0, 10.0), IntersectionDetail::Intersects);
        assert_eq!(relate(100.0, 0.0, 10.0), IntersectionDetail::Intersects);
    }

    #[test]
    fn test_relate_with_hole() {
        // query sits inside the hole of an even-odd ring
        let ring = PreparedRegion::new(Region::polygons(
            vec![square(0.0, 0.0, 100.0), square(20.0, 20.0, 60.0)],
            FillRule::EvenOdd,
        ));
        let query = PreparedRegion::new(rect_region(40.0, 40.0, 10.0));
        assert_eq!(ring.relate(&query), IntersectionDetail::Empty);
    }
}
