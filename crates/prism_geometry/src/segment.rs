//! Raw figure buffers
//!
//! Every geometry kind can lower itself to one or more figures made of a
//! flat point buffer plus one flag byte per segment. A figure's first point
//! is its start point; each line segment then consumes one point and each
//! cubic Bezier segment three (two control points and the end point).

use bitflags::bitflags;
use prism_core::{Matrix, Point, Rect};

bitflags! {
    /// Per-segment flags
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SegmentFlags: u8 {
        const LINE = 0x01;
        const BEZIER = 0x02;
        const TYPE_MASK = 0x03;
        /// Segment is not stroked
        const GAP = 0x04;
        /// Join with the previous segment is rendered smooth
        const SMOOTH_JOIN = 0x08;
        /// Set on the first segment of a closed figure
        const CLOSED = 0x10;
        /// Segment came from a curve
        const CURVED = 0x20;
    }
}

impl SegmentFlags {
    pub fn is_bezier(self) -> bool {
        self.intersection(Self::TYPE_MASK) == Self::BEZIER
    }

    pub fn is_gap(self) -> bool {
        self.contains(Self::GAP)
    }

    /// Number of points the segment consumes from the buffer
    pub fn point_count(self) -> usize {
        if self.is_bezier() {
            3
        } else {
            1
        }
    }

    /// Flags for a segment with the given stroke and join settings
    pub fn with_options(self, is_stroked: bool, is_smooth_join: bool) -> Self {
        let mut flags = self;
        flags.set(Self::GAP, !is_stroked);
        flags.set(Self::SMOOTH_JOIN, is_smooth_join);
        flags
    }
}

/// One decoded segment of a raw figure
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RawSegment {
    Line {
        from: Point,
        to: Point,
        flags: SegmentFlags,
    },
    Bezier {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        flags: SegmentFlags,
    },
}

impl RawSegment {
    pub fn flags(&self) -> SegmentFlags {
        match self {
            RawSegment::Line { flags, .. } | RawSegment::Bezier { flags, .. } => *flags,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            RawSegment::Line { to, .. } | RawSegment::Bezier { to, .. } => *to,
        }
    }
}

/// Borrowed view of a figure's point and flag buffers
#[derive(Clone, Copy, Debug)]
pub struct RawFigure<'a> {
    pub points: &'a [Point],
    pub types: &'a [SegmentFlags],
    pub filled: bool,
}

impl<'a> RawFigure<'a> {
    pub fn new(points: &'a [Point], types: &'a [SegmentFlags], filled: bool) -> Self {
        Self {
            points,
            types,
            filled,
        }
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn is_closed(&self) -> bool {
        self.types
            .first()
            .is_some_and(|flags| flags.contains(SegmentFlags::CLOSED))
    }

    pub fn has_segments(&self) -> bool {
        !self.types.is_empty() && self.points.len() > 1
    }

    /// Decode the segments, stopping early if the point buffer runs short
    pub fn segments(&self) -> RawSegments<'a> {
        RawSegments {
            points: self.points,
            types: self.types,
            cursor: 1,
            index: 0,
        }
    }

    /// Bounds of every point in the buffer after transformation
    ///
    /// Control points are included, so the result contains the curve.
    pub fn control_bounds(&self, matrix: &Matrix) -> Rect {
        self.points.iter().fold(Rect::EMPTY, |bounds, p| {
            bounds.union_point(matrix.transform_point(*p))
        })
    }
}

/// Iterator over the segments of a [`RawFigure`]
pub struct RawSegments<'a> {
    points: &'a [Point],
    types: &'a [SegmentFlags],
    cursor: usize,
    index: usize,
}

impl Iterator for RawSegments<'_> {
    type Item = RawSegment;

    fn next(&mut self) -> Option<RawSegment> {
        let flags = *self.types.get(self.index)?;
        let from = *self.points.get(self.cursor.checked_sub(1)?)?;
        let needed = flags.point_count();
        let pts = self.points.get(self.cursor..self.cursor + needed)?;

        self.index += 1;
        self.cursor += needed;

        Some(if flags.is_bezier() {
            RawSegment::Bezier {
                from,
                ctrl1: pts[0],
                ctrl2: pts[1],
                to: pts[2],
                flags,
            }
        } else {
            RawSegment::Line {
                from,
                to: pts[0],
                flags,
            }
        })
    }
}

/// Owned figure buffers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FigureData {
    pub points: Vec<Point>,
    pub types: Vec<SegmentFlags>,
    pub filled: bool,
}

impl FigureData {
    pub fn new(start: Point, filled: bool) -> Self {
        Self {
            points: vec![start],
            types: Vec::new(),
            filled,
        }
    }

    pub fn from_parts(points: Vec<Point>, types: Vec<SegmentFlags>, filled: bool) -> Self {
        Self {
            points,
            types,
            filled,
        }
    }

    pub fn line_to(&mut self, to: Point, flags: SegmentFlags) {
        self.points.push(to);
        self.types.push(flags.difference(SegmentFlags::TYPE_MASK) | SegmentFlags::LINE);
    }

    pub fn bezier_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point, flags: SegmentFlags) {
        self.points.extend([ctrl1, ctrl2, to]);
        self.types.push(flags.difference(SegmentFlags::TYPE_MASK) | SegmentFlags::BEZIER);
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Mark the figure closed (no-op without segments)
    pub fn close(&mut self) {
        if let Some(first) = self.types.first_mut() {
            first.insert(SegmentFlags::CLOSED);
        }
    }

    pub fn as_raw(&self) -> RawFigure<'_> {
        RawFigure::new(&self.points, &self.types, self.filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_decoding() {
        let mut figure = FigureData::new(Point::new(0.0, 0.0), true);
        figure.line_to(Point::new(10.0, 0.0), SegmentFlags::empty());
        figure.bezier_to(
            Point::new(12.0, 2.0),
            Point::new(12.0, 8.0),
            Point::new(10.0, 10.0),
            SegmentFlags::CURVED,
        );
        figure.close();

        let raw = figure.as_raw();
        assert!(raw.is_closed());

        let segments: Vec<_> = raw.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0],
            RawSegment::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(10.0, 0.0),
                flags: SegmentFlags::LINE | SegmentFlags::CLOSED,
            }
        );
        assert_eq!(segments[1].end(), Point::new(10.0, 10.0));
        assert!(segments[1].flags().is_bezier());
    }

    #[test]
    fn test_truncated_buffer_stops() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let types = [SegmentFlags::BEZIER];
        let raw = RawFigure::new(&points, &types, true);
        assert_eq!(raw.segments().count(), 0);
    }

    #[test]
    fn test_flag_options() {
        let flags = SegmentFlags::LINE.with_options(false, true);
        assert!(flags.is_gap());
        assert!(flags.contains(SegmentFlags::SMOOTH_JOIN));
        assert_eq!(flags.point_count(), 1);
        assert_eq!(SegmentFlags::BEZIER.point_count(), 3);
    }
}
