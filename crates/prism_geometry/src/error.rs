//! Geometry error types

use std::fmt;

use thiserror::Error;

/// What went wrong while reading path data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A character that is not valid at this position
    UnexpectedToken,
    /// A numeric token the float parser rejected
    InvalidNumber,
    /// The input ended while more data was required
    UnexpectedEnd,
}

/// Path mini-language parse failure
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{kind} in path data {path:?} at index {index}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Character (not byte) index of the failing position in `path`
    pub index: usize,
    pub path: String,
}

impl ParseError {
    /// `offset` is the scanner's byte offset; it is stored as a char index
    pub(crate) fn new(kind: ParseErrorKind, offset: usize, path: &str) -> Self {
        let index = match path.get(..offset) {
            Some(prefix) => prefix.chars().count(),
            None => path.chars().count(),
        };

        Self {
            kind,
            index,
            path: path.to_string(),
        }
    }

    /// The input from the failing position onwards
    pub fn offending(&self) -> &str {
        match self.path.char_indices().nth(self.index) {
            Some((offset, _)) => &self.path[offset..],
            None => "",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::InvalidNumber => "invalid number",
            ParseErrorKind::UnexpectedEnd => "unexpected end of input",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offending_slice() {
        let err = ParseError::new(ParseErrorKind::UnexpectedToken, 6, "M 0,0 X 1,1");
        assert_eq!(err.offending(), "X 1,1");
        assert_eq!(
            err.to_string(),
            "unexpected token in path data \"M 0,0 X 1,1\" at index 6"
        );
    }

    #[test]
    fn test_offending_out_of_range() {
        let err = ParseError::new(ParseErrorKind::UnexpectedEnd, 40, "M 0");
        assert_eq!(err.index, 3);
        assert_eq!(err.offending(), "");
    }

    #[test]
    fn test_index_counts_chars() {
        // U+00A0 is two bytes in UTF-8
        let err = ParseError::new(ParseErrorKind::UnexpectedToken, 7, "M\u{a0}0,0 X 1,1");
        assert_eq!(err.index, 6);
        assert_eq!(err.offending(), "X 1,1");
    }
}
