//! Dialect-driven tokenizer.
//!
//! The lexer only knows enough about a language to find its tokens:
//! comments and preprocessor lines are skipped, literals are kept whole,
//! and every other non-word character becomes a one-character punctuation
//! token. Unterminated literals and comments are reported as errors and
//! lexing carries on.

use polyc_core::{Diagnostic, Span};

use crate::cursor::Cursor;
use crate::dialect::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    /// A string or character literal, quotes included.
    Literal,
    Punct,
    /// A line break; only produced for line-oriented dialects.
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl Token<'_> {
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct && self.text.starts_with(ch)
    }
}

/// Tokenize `source` with the rules of `dialect`.
///
/// Returned diagnostics carry a span but no section; the caller knows
/// which unit it lexed.
pub fn tokenize<'src>(source: &'src str, dialect: &Dialect) -> (Vec<Token<'src>>, Vec<Diagnostic>) {
    let mut lexer = Lexer {
        cursor: Cursor::new(source),
        dialect,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
        unterminated: false,
    };
    lexer.run();
    (lexer.tokens, lexer.diagnostics)
}

/// Keywords after which an operand, and so a regular expression, may follow.
const OPERAND_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "in", "of", "new", "delete", "void", "throw", "instanceof",
];

struct Lexer<'src, 'd> {
    cursor: Cursor<'src>,
    dialect: &'d Dialect,
    tokens: Vec<Token<'src>>,
    diagnostics: Vec<Diagnostic>,
    /// Set when the last literal ran into a line break or end of input.
    unterminated: bool,
}

impl<'src> Lexer<'src, '_> {
    fn run(&mut self) {
        while let Some(ch) = self.cursor.peek() {
            let start = self.cursor.offset();
            let (line, col) = (self.cursor.line(), self.cursor.column());

            if ch == '\n' || ch == '\r' {
                self.cursor.advance();
                if ch == '\r' {
                    self.cursor.eat('\n');
                }
                if self.dialect.line_oriented {
                    self.push(TokenKind::Newline, start, line, col);
                }
                continue;
            }

            if ch.is_whitespace() {
                self.cursor.advance();
                continue;
            }

            if ch == '#' && self.dialect.preprocessor_lines && self.cursor.at_line_start() {
                if self.dialect.line_oriented {
                    self.cursor.skip_line();
                } else {
                    self.cursor.skip_continued_line();
                }
                continue;
            }

            if self.at_line_comment() {
                self.cursor.skip_line();
                continue;
            }

            if let Some((open, close)) = self.dialect.block_comment {
                if self.cursor.check_str(open) {
                    self.block_comment(open, close, line, col);
                    continue;
                }
            }

            if ch == '/' && self.dialect.regex_literals && self.regex_allowed() {
                self.regex(line, col);
                self.push(TokenKind::Literal, start, line, col);
                continue;
            }

            if self.dialect.verbatim_prefix == Some(ch) && self.cursor.peek_nth(1) == Some('"') {
                self.cursor.advance();
                self.literal('"', true, false, true);
                self.finish_literal(start, line, col);
                continue;
            }

            if self.dialect.quotes.contains(&ch) {
                self.literal(
                    ch,
                    false,
                    self.dialect.backslash_escapes,
                    self.dialect.doubled_quote_escapes,
                );
                self.finish_literal(start, line, col);
                continue;
            }

            if self.dialect.multiline_quotes.contains(&ch) {
                self.literal(ch, true, self.dialect.backslash_escapes, false);
                self.finish_literal(start, line, col);
                continue;
            }

            if ch.is_alphabetic() || ch == '_' || self.dialect.identifier_extra.contains(&ch) {
                let extra = self.dialect.identifier_extra;
                self.cursor
                    .eat_while(|c| c.is_alphanumeric() || c == '_' || extra.contains(&c));
                self.push(TokenKind::Identifier, start, line, col);
                continue;
            }

            if ch.is_ascii_digit() {
                self.number();
                self.push(TokenKind::Number, start, line, col);
                continue;
            }

            self.cursor.advance();
            self.push(TokenKind::Punct, start, line, col);
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: u32, col: u32) {
        self.tokens.push(Token {
            kind,
            text: self.cursor.slice_from(start),
            span: self.cursor.span_from(start, line, col),
        });
    }

    fn at_line_comment(&self) -> bool {
        if self
            .dialect
            .line_comments
            .iter()
            .any(|marker| self.cursor.check_str(marker))
        {
            return true;
        }
        self.dialect.comment_keywords.iter().any(|kw| {
            self.cursor.check_str_ignore_case(kw)
                && self
                    .cursor
                    .peek_nth(kw.chars().count())
                    .is_none_or(char::is_whitespace)
        })
    }

    fn block_comment(&mut self, open: &str, close: &str, line: u32, col: u32) {
        self.cursor.advance_str(open);
        while !self.cursor.is_eof() {
            if self.cursor.check_str(close) {
                self.cursor.advance_str(close);
                return;
            }
            self.cursor.advance();
        }
        self.diagnostics
            .push(Diagnostic::error("unterminated block comment").at(Span::point(line, col)));
    }

    /// Whether a `/` at the cursor starts a regular expression rather than
    /// dividing the previous operand.
    fn regex_allowed(&self) -> bool {
        let Some(prev) = self.tokens.last() else {
            return true;
        };
        match prev.kind {
            TokenKind::Number | TokenKind::Literal => false,
            TokenKind::Identifier => OPERAND_KEYWORDS.contains(&prev.text),
            TokenKind::Punct => !matches!(prev.text, ")" | "]"),
            TokenKind::Newline => true,
        }
    }

    /// Consume `/body/flags`. A `/` inside a `[...]` class does not end the
    /// body.
    fn regex(&mut self, line: u32, col: u32) {
        self.cursor.advance();
        let mut in_class = false;
        loop {
            match self.cursor.peek() {
                None | Some('\n' | '\r') => {
                    self.diagnostics.push(
                        Diagnostic::error("unterminated regular expression literal")
                            .at(Span::point(line, col)),
                    );
                    return;
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('/') if !in_class => {
                    self.cursor.advance();
                    self.cursor.eat_while(|c| c.is_ascii_alphabetic());
                    return;
                }
                Some(c) => {
                    match c {
                        '[' => in_class = true,
                        ']' => in_class = false,
                        _ => {}
                    }
                    self.cursor.advance();
                }
            }
        }
    }

    /// Consume a literal opened by `quote`. Errors are recorded by
    /// [`finish_literal`](Self::finish_literal).
    fn literal(&mut self, quote: char, multiline: bool, backslash: bool, doubled: bool) {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None => break,
                Some('\n' | '\r') if !multiline => break,
                Some('\\') if backslash => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    if doubled && self.cursor.peek() == Some(quote) {
                        self.cursor.advance();
                        continue;
                    }
                    return;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        self.unterminated = true;
    }

    fn finish_literal(&mut self, start: usize, line: u32, col: u32) {
        if std::mem::take(&mut self.unterminated) {
            self.diagnostics
                .push(Diagnostic::error("unterminated string literal").at(Span::point(line, col)));
        }
        self.push(TokenKind::Literal, start, line, col);
    }

    fn number(&mut self) {
        let separator = self.dialect.digit_separator;
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '.' => {
                    self.cursor.advance();
                }
                Some(c)
                    if Some(c) == separator
                        && self
                            .cursor
                            .peek_nth(1)
                            .is_some_and(|next| next.is_ascii_alphanumeric()) =>
                {
                    self.cursor.advance();
                }
                _ => break,
            }
        }
    }
}
