//! Positions inside a source unit.

use std::fmt;

/// Where a token or diagnostic starts, plus how many bytes it covers.
///
/// `line` and `col` start at 1 and `col` counts bytes, which is what the
/// `section:line:col` prefix of a rendered [`Diagnostic`](crate::Diagnostic)
/// shows. Spans order by position, so a unit's diagnostics can be sorted
/// into source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// A zero-length span, for problems found at a position rather than
    /// over a token.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, 0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
