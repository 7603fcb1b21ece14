//! Character cursor used by the dialect lexer.

use polyc_core::Span;

/// A cursor over source text that tracks position.
///
/// Tracks byte offset, line and column as it advances, and whether only
/// whitespace has been consumed since the last newline.
pub struct Cursor<'src> {
    source: &'src str,
    offset: usize,
    line: u32,
    column: u32,
    at_line_start: bool,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            at_line_start: true,
        }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Only whitespace precedes the cursor on the current line.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    #[inline]
    fn rest(&self) -> &'src str {
        &self.source[self.offset..]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek at the nth character ahead (0 = current).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    #[inline]
    pub fn check(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Case-insensitive [`check_str`](Self::check_str) for ASCII keywords.
    pub fn check_str_ignore_case(&self, s: &str) -> bool {
        self.rest()
            .as_bytes()
            .get(..s.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(s.as_bytes()))
    }

    /// Consume the current character and advance.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        // A lone `\r` ends a line too.
        if ch == '\n' || (ch == '\r' && self.peek() != Some('\n')) {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += ch.len_utf8() as u32;
            if !ch.is_whitespace() {
                self.at_line_start = false;
            }
        }
        Some(ch)
    }

    /// Advance over `s`, which must be the upcoming text.
    pub fn advance_str(&mut self, s: &str) {
        debug_assert!(self.check_str_ignore_case(s));
        for _ in s.chars() {
            self.advance();
        }
    }

    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate matches, returning them.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset;
        while self.check(&f) {
            self.advance();
        }
        &self.source[start..self.offset]
    }

    /// Consume up to, but not including, the next line break.
    pub fn skip_line(&mut self) {
        self.eat_while(|c| c != '\n' && c != '\r');
    }

    /// Like [`skip_line`](Self::skip_line), but a line ending in `\`
    /// carries on past its break.
    pub fn skip_continued_line(&mut self) {
        loop {
            let line = self.eat_while(|c| c != '\n' && c != '\r');
            if !line.trim_end().ends_with('\\') || self.is_eof() {
                return;
            }
            if self.advance() == Some('\r') {
                self.eat('\n');
            }
        }
    }

    #[inline]
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.offset]
    }

    /// A span from a recorded start position to the cursor.
    pub fn span_from(&self, start: usize, line: u32, column: u32) -> Span {
        Span::new(line, column, (self.offset - start) as u32)
    }
}
