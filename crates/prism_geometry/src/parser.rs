//! Path mini-language parser
//!
//! Reads the compact path syntax (`M 0,0 L 10,0 10,10 Z`, SVG-style
//! absolute/relative command letters) and replays it against a
//! [`StreamGeometryContext`]. An optional `F0`/`F1` prefix selects the
//! even-odd or non-zero fill rule.
//!
//! Numbers may be separated by whitespace, at most one comma, or nothing at
//! all when a sign or decimal point makes the boundary unambiguous
//! (`1.5-2` is two numbers). `Infinity` and `NaN` are accepted.

use prism_core::{Point, Size};

use crate::context::StreamGeometryContext;
use crate::error::{ParseError, ParseErrorKind};
use crate::path::{FillRule, SweepDirection};

const ALLOW_COMMA: bool = true;
const ALLOW_SIGN: bool = true;

/// Longest token (sign included) read without the general float parser
const FAST_INTEGER_LEN: usize = 8;

/// Parse `data` into `context`
///
/// Empty or whitespace-only input produces no figures. On error nothing
/// after the failing token is emitted and the caller should discard what
/// the context collected.
pub fn parse_path_data<C>(data: &str, context: &mut C) -> Result<(), ParseError>
where
    C: StreamGeometryContext + ?Sized,
{
    let mut parser = AbbreviatedGeometryParser::new(data, context);
    parser.parse()
}

struct AbbreviatedGeometryParser<'a, C: ?Sized> {
    path: &'a str,
    context: &'a mut C,
    cur_index: usize,
    /// Byte offset of the most recently consumed token
    token_start: usize,

    last_start: Point,
    last_point: Point,
    second_last_point: Point,
    figure_started: bool,
}

impl<'a, C> AbbreviatedGeometryParser<'a, C>
where
    C: StreamGeometryContext + ?Sized,
{
    fn new(path: &'a str, context: &'a mut C) -> Self {
        Self {
            path,
            context,
            cur_index: 0,
            token_start: 0,
            last_start: Point::ZERO,
            last_point: Point::ZERO,
            second_last_point: Point::ZERO,
            figure_started: false,
        }
    }

    fn parse(&mut self) -> Result<(), ParseError> {
        self.parse_fill_rule()?;

        let mut first = true;
        let mut last_cmd = ' ';

        while let Some(cmd) = self.read_token()? {
            if first {
                if cmd != 'M' && cmd != 'm' {
                    return Err(self.bad_token());
                }
                first = false;
            }

            match cmd {
                'm' | 'M' => {
                    self.last_point = self.read_point(cmd, !ALLOW_COMMA)?;
                    self.context.begin_figure(self.last_point, true, false);
                    self.figure_started = true;
                    self.last_start = self.last_point;
                    last_cmd = 'M';

                    // Extra coordinate pairs are implicit line-tos
                    while self.is_number(ALLOW_COMMA)? {
                        self.last_point = self.read_point(cmd, !ALLOW_COMMA)?;
                        self.context.line_to(self.last_point, true, false);
                        last_cmd = 'L';
                    }
                }

                'l' | 'L' | 'h' | 'H' | 'v' | 'V' => {
                    self.ensure_figure();
                    loop {
                        match cmd {
                            'l' | 'L' => self.last_point = self.read_point(cmd, !ALLOW_COMMA)?,
                            'h' => self.last_point.x += self.read_number(!ALLOW_COMMA)?,
                            'H' => self.last_point.x = self.read_number(!ALLOW_COMMA)?,
                            'v' => self.last_point.y += self.read_number(!ALLOW_COMMA)?,
                            _ => self.last_point.y = self.read_number(!ALLOW_COMMA)?,
                        }
                        self.context.line_to(self.last_point, true, false);

                        if !self.is_number(ALLOW_COMMA)? {
                            break;
                        }
                    }
                    last_cmd = 'L';
                }

                'c' | 'C' | 's' | 'S' => {
                    self.ensure_figure();
                    loop {
                        let ctrl1 = if cmd == 's' || cmd == 'S' {
                            let reflected = if last_cmd == 'C' {
                                self.reflect()
                            } else {
                                self.last_point
                            };
                            self.second_last_point = self.read_point(cmd, !ALLOW_COMMA)?;
                            reflected
                        } else {
                            let ctrl1 = self.read_point(cmd, !ALLOW_COMMA)?;
                            self.second_last_point = self.read_point(cmd, ALLOW_COMMA)?;
                            ctrl1
                        };

                        self.last_point = self.read_point(cmd, ALLOW_COMMA)?;
                        self.context
                            .bezier_to(ctrl1, self.second_last_point, self.last_point, true, false);
                        last_cmd = 'C';

                        if !self.is_number(ALLOW_COMMA)? {
                            break;
                        }
                    }
                }

                'q' | 'Q' | 't' | 'T' => {
                    self.ensure_figure();
                    loop {
                        if cmd == 't' || cmd == 'T' {
                            self.second_last_point = if last_cmd == 'Q' {
                                self.reflect()
                            } else {
                                self.last_point
                            };
                            self.last_point = self.read_point(cmd, !ALLOW_COMMA)?;
                        } else {
                            self.second_last_point = self.read_point(cmd, !ALLOW_COMMA)?;
                            self.last_point = self.read_point(cmd, ALLOW_COMMA)?;
                        }

                        self.context.quadratic_bezier_to(
                            self.second_last_point,
                            self.last_point,
                            true,
                            false,
                        );
                        last_cmd = 'Q';

                        if !self.is_number(ALLOW_COMMA)? {
                            break;
                        }
                    }
                }

                'a' | 'A' => {
                    self.ensure_figure();
                    loop {
                        let width = self.read_number(!ALLOW_COMMA)?;
                        let height = self.read_number(ALLOW_COMMA)?;
                        let rotation = self.read_number(ALLOW_COMMA)?;
                        let large = self.read_bool()?;
                        let sweep = self.read_bool()?;

                        self.last_point = self.read_point(cmd, ALLOW_COMMA)?;
                        let direction = if sweep {
                            SweepDirection::Clockwise
                        } else {
                            SweepDirection::Counterclockwise
                        };
                        self.context.arc_to(
                            self.last_point,
                            Size::new(width, height),
                            rotation,
                            large,
                            direction,
                            true,
                            false,
                        );

                        if !self.is_number(ALLOW_COMMA)? {
                            break;
                        }
                    }
                    last_cmd = 'A';
                }

                'z' | 'Z' => {
                    self.ensure_figure();
                    self.context.set_closed_state(true);
                    self.figure_started = false;
                    last_cmd = 'Z';

                    // Relative commands after a close are relative to the figure start
                    self.last_point = self.last_start;
                }

                _ => return Err(self.bad_token()),
            }
        }

        Ok(())
    }

    /// Optional leading `F0` / `F1`
    fn parse_fill_rule(&mut self) -> Result<(), ParseError> {
        self.skip_white_space(!ALLOW_COMMA)?;
        if self.peek() != Some('F') {
            return Ok(());
        }

        self.cur_index += 1;
        self.skip_white_space(!ALLOW_COMMA)?;
        let fill_rule = match self.peek() {
            Some('0') => FillRule::EvenOdd,
            Some('1') => FillRule::Nonzero,
            _ => return Err(self.unexpected_here()),
        };
        self.cur_index += 1;
        self.context.set_fill_rule(fill_rule);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Figure state
    // ─────────────────────────────────────────────────────────────────────────

    /// Drawing after a close starts a new figure at the previous start point
    fn ensure_figure(&mut self) {
        if !self.figure_started {
            self.context.begin_figure(self.last_start, true, false);
            self.figure_started = true;
        }
    }

    fn reflect(&self) -> Point {
        Point::new(
            2.0 * self.last_point.x - self.second_last_point.x,
            2.0 * self.last_point.y - self.second_last_point.y,
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scanner
    // ─────────────────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.path.get(self.cur_index..)?.chars().next()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.path.as_bytes().get(self.cur_index).copied()
    }

    /// Error at the token just consumed
    fn bad_token(&self) -> ParseError {
        ParseError::new(ParseErrorKind::UnexpectedToken, self.token_start, self.path)
    }

    fn unexpected_here(&self) -> ParseError {
        match self.peek() {
            Some(_) => ParseError::new(ParseErrorKind::UnexpectedToken, self.cur_index, self.path),
            None => self.unexpected_end(),
        }
    }

    fn unexpected_end(&self) -> ParseError {
        ParseError::new(ParseErrorKind::UnexpectedEnd, self.path.len(), self.path)
    }

    /// Skip whitespace and at most one comma; returns whether a comma was met
    fn skip_white_space(&mut self, mut allow_comma: bool) -> Result<bool, ParseError> {
        let mut comma_met = false;

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\n' | '\r' | '\t' => {}
                ',' => {
                    if allow_comma {
                        comma_met = true;
                        allow_comma = false;
                    } else {
                        self.token_start = self.cur_index;
                        return Err(self.bad_token());
                    }
                }
                _ => {
                    if (ch > ' ' && ch <= 'z') || !ch.is_whitespace() {
                        return Ok(comma_met);
                    }
                }
            }
            self.cur_index += ch.len_utf8();
        }

        Ok(comma_met)
    }

    fn read_token(&mut self) -> Result<Option<char>, ParseError> {
        self.skip_white_space(!ALLOW_COMMA)?;

        let token = self.peek();
        if let Some(ch) = token {
            self.token_start = self.cur_index;
            self.cur_index += ch.len_utf8();
        }
        Ok(token)
    }

    /// Whether a number starts at the cursor
    ///
    /// A comma that is not followed by a number is an error.
    fn is_number(&mut self, allow_comma: bool) -> Result<bool, ParseError> {
        let comma_met = self.skip_white_space(allow_comma)?;

        if matches!(
            self.peek(),
            Some('.' | '-' | '+' | '0'..='9' | 'I' | 'N')
        ) {
            return Ok(true);
        }

        if comma_met {
            return Err(self.unexpected_here());
        }

        Ok(false)
    }

    fn skip_digits(&mut self, sign_allowed: bool) {
        if sign_allowed && matches!(self.peek_byte(), Some(b'-' | b'+')) {
            self.cur_index += 1;
        }

        while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
            self.cur_index += 1;
        }
    }

    fn read_bool(&mut self) -> Result<bool, ParseError> {
        self.skip_white_space(ALLOW_COMMA)?;

        match self.peek() {
            Some(ch) => {
                self.token_start = self.cur_index;
                self.cur_index += ch.len_utf8();
                match ch {
                    '0' => Ok(false),
                    '1' => Ok(true),
                    _ => Err(self.bad_token()),
                }
            }
            None => Err(self.unexpected_end()),
        }
    }

    fn read_number(&mut self, allow_comma: bool) -> Result<f64, ParseError> {
        if !self.is_number(allow_comma)? {
            return Err(self.unexpected_here());
        }

        let start = self.cur_index;
        let mut simple = true;

        if matches!(self.peek_byte(), Some(b'-' | b'+')) {
            self.cur_index += 1;
        }

        match self.peek_byte() {
            Some(b'I') => {
                // "Infinity"; the float parser validates the characters
                self.cur_index = (self.cur_index + 8).min(self.path.len());
                simple = false;
            }
            Some(b'N') => {
                // "NaN"
                self.cur_index = (self.cur_index + 3).min(self.path.len());
                simple = false;
            }
            _ => {
                self.skip_digits(!ALLOW_SIGN);

                if self.peek_byte() == Some(b'.') {
                    simple = false;
                    self.cur_index += 1;
                    self.skip_digits(!ALLOW_SIGN);
                }

                if matches!(self.peek_byte(), Some(b'e' | b'E')) {
                    simple = false;
                    self.cur_index += 1;
                    self.skip_digits(ALLOW_SIGN);
                }
            }
        }

        let token = self.path.get(start..self.cur_index).unwrap_or("");

        if simple && self.cur_index <= start + FAST_INTEGER_LEN {
            return parse_small_integer(token)
                .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidNumber, start, self.path));
        }

        token
            .parse::<f64>()
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber, start, self.path))
    }

    fn read_point(&mut self, cmd: char, allow_comma: bool) -> Result<Point, ParseError> {
        let mut x = self.read_number(allow_comma)?;
        let mut y = self.read_number(ALLOW_COMMA)?;

        if cmd.is_ascii_lowercase() {
            x += self.last_point.x;
            y += self.last_point.y;
        }

        Ok(Point::new(x, y))
    }
}

/// Signed decimal integer of at most eight characters
fn parse_small_integer(token: &str) -> Option<f64> {
    let (sign, digits) = match token.as_bytes().first() {
        Some(b'-') => (-1.0, &token[1..]),
        Some(b'+') => (1.0, &token[1..]),
        _ => (1.0, token),
    };

    if digits.is_empty() {
        return None;
    }

    let value = digits
        .bytes()
        .try_fold(0i32, |acc, b| match b {
            b'0'..=b'9' => Some(acc * 10 + i32::from(b - b'0')),
            _ => None,
        })?;

    Some(sign * f64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{PathGeometry, PathGeometryBuilder, PathSegmentKind};

    fn parse(data: &str) -> PathGeometry {
        PathGeometry::parse(data).unwrap()
    }

    fn line_end(path: &PathGeometry, figure: usize, segment: usize) -> Point {
        match path.figures[figure].segments[segment].kind {
            PathSegmentKind::Line { to } => to,
            ref other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_closed_triangle() {
        let path = parse("M 0,0 L 10,0 10,10 Z");

        assert_eq!(path.figures.len(), 1);
        let figure = &path.figures[0];
        assert_eq!(figure.start_point, Point::new(0.0, 0.0));
        assert_eq!(figure.segments.len(), 2);
        assert_eq!(line_end(&path, 0, 0), Point::new(10.0, 0.0));
        assert_eq!(line_end(&path, 0, 1), Point::new(10.0, 10.0));
        assert!(figure.is_closed);
        assert!(figure.is_filled);
    }

    #[test]
    fn test_smooth_cubic_reflects_control_point() {
        let path = parse("M0,0C1,1 2,2 3,3 S4,4 5,5");

        let segments = &path.figures[0].segments;
        assert_eq!(segments.len(), 2);
        match segments[1].kind {
            PathSegmentKind::Bezier { ctrl1, ctrl2, to } => {
                assert_eq!(ctrl1, Point::new(4.0, 4.0));
                assert_eq!(ctrl2, Point::new(4.0, 4.0));
                assert_eq!(to, Point::new(5.0, 5.0));
            }
            ref other => panic!("expected bezier, got {other:?}"),
        }
    }

    #[test]
    fn test_smooth_cubic_without_previous_cubic() {
        let path = parse("M1,1 L2,2 S4,4 5,5");

        match path.figures[0].segments[1].kind {
            PathSegmentKind::Bezier { ctrl1, .. } => assert_eq!(ctrl1, Point::new(2.0, 2.0)),
            ref other => panic!("expected bezier, got {other:?}"),
        }
    }

    #[test]
    fn test_smooth_quadratic() {
        let path = parse("M0,0 Q1,2 2,0 T4,0");

        match path.figures[0].segments[1].kind {
            PathSegmentKind::QuadraticBezier { ctrl, to } => {
                assert_eq!(ctrl, Point::new(3.0, -2.0));
                assert_eq!(to, Point::new(4.0, 0.0));
            }
            ref other => panic!("expected quadratic, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_token_index() {
        let err = PathGeometry::parse("M 0,0 X 1,1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.index, 6);
        assert_eq!(err.offending(), "X 1,1");
    }

    #[test]
    fn test_bad_token_index_after_wide_whitespace() {
        let err = PathGeometry::parse("M\u{a0}0,0 X 1,1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.index, 6);
        assert_eq!(err.offending(), "X 1,1");
    }

    #[test]
    fn test_must_start_with_move() {
        let err = PathGeometry::parse("L 1,1").unwrap_err();
        assert_eq!(err.index, 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("  \n\t ").is_empty());
    }

    #[test]
    fn test_implicit_line_to_after_move() {
        let path = parse("m 1,1 2,0 0,2");

        let figure = &path.figures[0];
        assert_eq!(figure.start_point, Point::new(1.0, 1.0));
        assert_eq!(line_end(&path, 0, 0), Point::new(3.0, 1.0));
        assert_eq!(line_end(&path, 0, 1), Point::new(3.0, 3.0));
    }

    #[test]
    fn test_horizontal_vertical_repeat() {
        let path = parse("M0,0 H5 10 V3 v2 h-1");

        let ends: Vec<_> = (0..5).map(|i| line_end(&path, 0, i)).collect();
        assert_eq!(
            ends,
            vec![
                Point::new(5.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 3.0),
                Point::new(10.0, 5.0),
                Point::new(9.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_relative_after_close() {
        let path = parse("M10,10 l5,0 z l0,5");

        assert_eq!(path.figures.len(), 2);
        assert!(path.figures[0].is_closed);
        // new figure starts at the previous start, relative to it
        assert_eq!(path.figures[1].start_point, Point::new(10.0, 10.0));
        assert_eq!(line_end(&path, 1, 0), Point::new(10.0, 15.0));
        assert!(!path.figures[1].is_closed);
    }

    #[test]
    fn test_numbers_without_separators() {
        let path = parse("M1.5-2L.5.5");

        assert_eq!(path.figures[0].start_point, Point::new(1.5, -2.0));
        assert_eq!(line_end(&path, 0, 0), Point::new(0.5, 0.5));
    }

    #[test]
    fn test_exponents_and_special_values() {
        let path = parse("M1e2,-2.5E-1 L Infinity,NaN");

        assert_eq!(path.figures[0].start_point, Point::new(100.0, -0.25));
        let end = line_end(&path, 0, 0);
        assert_eq!(end.x, f64::INFINITY);
        assert!(end.y.is_nan());
    }

    #[test]
    fn test_arc_flags() {
        let path = parse("M0,0 A5,5 30 1 0 10,0");

        match path.figures[0].segments[0].kind {
            PathSegmentKind::Arc {
                to,
                size,
                rotation_angle,
                is_large_arc,
                sweep_direction,
            } => {
                assert_eq!(to, Point::new(10.0, 0.0));
                assert_eq!(size, Size::new(5.0, 5.0));
                assert_eq!(rotation_angle, 30.0);
                assert!(is_large_arc);
                assert_eq!(sweep_direction, SweepDirection::Counterclockwise);
            }
            ref other => panic!("expected arc, got {other:?}"),
        }

        assert!(PathGeometry::parse("M0,0 A5,5 30 2 0 10,0").is_err());
    }

    #[test]
    fn test_fill_rule_prefix() {
        assert_eq!(parse("F1 M0,0 L1,1").fill_rule, FillRule::Nonzero);
        assert_eq!(parse("F0 M0,0 L1,1").fill_rule, FillRule::EvenOdd);
        assert_eq!(parse("M0,0 L1,1").fill_rule, FillRule::EvenOdd);
        assert!(PathGeometry::parse("F2 M0,0").is_err());
    }

    #[test]
    fn test_comma_rules() {
        assert!(PathGeometry::parse("M 0,,0").is_err());
        assert!(PathGeometry::parse("M 0,0,").is_err());
        assert!(PathGeometry::parse("M ,0 0").is_err());
        assert!(parse("M 0 , 0").figures.len() == 1);
    }

    #[test]
    fn test_truncated_input() {
        let err = PathGeometry::parse("M 0,0 L 5").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd);

        let err = PathGeometry::parse("M 0,- L").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber);
        assert_eq!(err.index, 4);
    }

    #[test]
    fn test_long_integers_use_float_parser() {
        let path = parse("M123456789,-12345678 L0,0");
        assert_eq!(path.figures[0].start_point, Point::new(123456789.0, -12345678.0));
    }

    #[test]
    fn test_parses_into_any_context() {
        let mut builder = PathGeometryBuilder::new();
        parse_path_data("M0,0 C1,0 2,1 2,2", &mut builder).unwrap();
        let path = builder.build();
        assert_eq!(path.figures[0].segments.len(), 1);
    }
}
