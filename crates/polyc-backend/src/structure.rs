//! Block-structure checking and declaration collection.
//!
//! Two checks run over a token stream:
//!
//! - delimiters `()`, `[]` and `{}` must nest and balance
//! - for dialects with `End X` blocks, every opened block must be closed by
//!   the matching `End` line
//!
//! The same walk collects named declarations for the module outline.

use polyc_core::{Diagnostic, Span};

use crate::dialect::Dialect;
use crate::lexer::{Token, TokenKind};
use crate::module::DeclarationKind;

/// A declaration found in one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredName<'src> {
    pub kind: DeclarationKind,
    pub name: &'src str,
    pub span: Span,
}

/// Check the structure of one unit's tokens.
pub fn check<'src>(
    tokens: &[Token<'src>],
    dialect: &Dialect,
) -> (Vec<DeclaredName<'src>>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    check_delimiters(tokens, &mut diagnostics);

    let declarations = if dialect.end_blocks.is_empty() {
        keyword_declarations(tokens, dialect)
    } else {
        check_end_blocks(tokens, dialect, &mut diagnostics)
    };

    (declarations, diagnostics)
}

// ============================================================================
// Delimiters
// ============================================================================

fn closing_for(open: &str) -> &'static str {
    match open {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

fn opening_for(close: &str) -> &'static str {
    match close {
        ")" => "(",
        "]" => "[",
        _ => "{",
    }
}

fn check_delimiters(tokens: &[Token<'_>], diagnostics: &mut Vec<Diagnostic>) {
    let mut open: Vec<&Token<'_>> = Vec::new();

    for token in tokens.iter().filter(|t| t.kind == TokenKind::Punct) {
        match token.text {
            "(" | "[" | "{" => open.push(token),
            ")" | "]" | "}" => {
                let wanted = opening_for(token.text);
                match open.last() {
                    Some(top) if top.text == wanted => {
                        open.pop();
                    }
                    Some(top) => {
                        diagnostics.push(
                            Diagnostic::error(format!(
                                "mismatched '{}': expected '{}' to close '{}' opened at {}",
                                token.text,
                                closing_for(top.text),
                                top.text,
                                top.span
                            ))
                            .at(token.span),
                        );
                        // Resynchronize on the nearest matching opener, if any.
                        if let Some(pos) = open.iter().rposition(|t| t.text == wanted) {
                            open.truncate(pos);
                        }
                    }
                    None => diagnostics.push(
                        Diagnostic::error(format!("unexpected '{}'", token.text)).at(token.span),
                    ),
                }
            }
            _ => {}
        }
    }

    for token in open {
        diagnostics.push(Diagnostic::error(format!("unclosed '{}'", token.text)).at(token.span));
    }
}

// ============================================================================
// Keyword-introduced declarations (brace dialects)
// ============================================================================

fn keyword_declarations<'src>(tokens: &[Token<'src>], dialect: &Dialect) -> Vec<DeclaredName<'src>> {
    tokens
        .windows(2)
        .filter_map(|pair| {
            let (keyword, name) = (&pair[0], &pair[1]);
            let is_decl = keyword.kind == TokenKind::Identifier
                && name.kind == TokenKind::Identifier
                && dialect.is_declaration_keyword(keyword.text)
                && !dialect.is_declaration_keyword(name.text);
            is_decl.then(|| DeclaredName {
                kind: DeclarationKind::from_keyword(keyword.text),
                name: name.text,
                span: name.span,
            })
        })
        .collect()
}

// ============================================================================
// End-terminated blocks (Basic family)
// ============================================================================

/// Modifiers that may precede a block keyword.
const MODIFIERS: &[&str] = &[
    "Public",
    "Private",
    "Protected",
    "Friend",
    "Shared",
    "Static",
    "Partial",
    "Overrides",
    "Overridable",
    "NotOverridable",
    "Overloads",
    "Shadows",
    "MustInherit",
    "NotInheritable",
    "ReadOnly",
    "WriteOnly",
    "Default",
    "Async",
    "Iterator",
    "Widening",
    "Narrowing",
];

/// Modifiers whose declaration has no body, so no `End` follows.
const BODILESS_MODIFIERS: &[&str] = &["MustOverride", "Declare", "Delegate"];

struct OpenBlock {
    keyword: &'static str,
    span: Span,
}

/// Split tokens into logical lines, joining ` _` continuations and
/// splitting on `:` statement separators.
fn logical_lines<'a, 'src>(tokens: &'a [Token<'src>]) -> Vec<Vec<&'a Token<'src>>> {
    let mut lines = Vec::new();
    let mut current: Vec<&Token<'src>> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Newline => {
                if current.last().is_some_and(|t| t.text == "_") {
                    current.pop();
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }
            TokenKind::Punct
                if token.text == ":" && !tokens.get(i + 1).is_some_and(|t| t.is_punct('=')) =>
            {
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push(token),
        }
    }
    lines.push(current);
    lines.retain(|line| !line.is_empty());
    lines
}

fn not_terminated(block: &OpenBlock) -> Diagnostic {
    Diagnostic::error(format!(
        "'{}' is not terminated by 'End {}'",
        block.keyword, block.keyword
    ))
    .at(block.span)
}

fn check_end_blocks<'src>(
    tokens: &[Token<'src>],
    dialect: &Dialect,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<DeclaredName<'src>> {
    let mut declarations = Vec::new();
    let mut open: Vec<OpenBlock> = Vec::new();
    let is_one_of = |word: &str, list: &[&str]| list.iter().any(|kw| dialect.keyword_eq(word, kw));

    for line in logical_lines(tokens) {
        let mut i = 0;

        // Leading attribute list: <Serializable()>
        if line[0].is_punct('<') {
            match line.iter().position(|t| t.is_punct('>')) {
                Some(end) => i = end + 1,
                None => continue,
            }
        }

        let mut bodiless = false;
        while let Some(word) = line.get(i).filter(|t| t.kind == TokenKind::Identifier) {
            if is_one_of(word.text, BODILESS_MODIFIERS) {
                bodiless = true;
            } else if !is_one_of(word.text, MODIFIERS) {
                break;
            }
            i += 1;
        }

        let Some(first) = line.get(i) else { continue };
        if first.kind != TokenKind::Identifier {
            continue;
        }

        if dialect.keyword_eq(first.text, "End") {
            if let Some(keyword) = line.get(i + 1).and_then(|t| dialect.end_block(t.text)) {
                close_block(&mut open, keyword, first.span, diagnostics);
            }
            continue;
        }

        let Some(keyword) = dialect.end_block(first.text) else {
            if let Some((keyword, span)) = lambda_block(&line[i..], dialect) {
                open.push(OpenBlock { keyword, span });
            }
            continue;
        };

        let in_interface = open.last().is_some_and(|b| b.keyword == "Interface");
        if bodiless || (in_interface && matches!(keyword, "Sub" | "Function")) {
            continue;
        }

        if let Some(name) = line.get(i + 1).filter(|t| t.kind == TokenKind::Identifier) {
            declarations.push(DeclaredName {
                kind: DeclarationKind::from_keyword(keyword),
                name: name.text,
                span: name.span,
            });
        }
        open.push(OpenBlock {
            keyword,
            span: first.span,
        });
    }

    for block in &open {
        diagnostics.push(not_terminated(block));
    }

    declarations
}

/// A multi-line lambda opened inside `line`: `Sub(...)` or `Function(...)`
/// followed by nothing but an optional `As` clause. Single-line lambdas
/// carry their body after the parameter list and open no block.
fn lambda_block(line: &[&Token<'_>], dialect: &Dialect) -> Option<(&'static str, Span)> {
    line.iter().enumerate().find_map(|(i, word)| {
        if word.kind != TokenKind::Identifier || !line.get(i + 1).is_some_and(|t| t.is_punct('(')) {
            return None;
        }
        let keyword = ["Sub", "Function"]
            .into_iter()
            .find(|kw| dialect.keyword_eq(word.text, kw))?;
        let close = matching_paren(line, i + 1)?;
        match line.get(close + 1) {
            None => Some((keyword, word.span)),
            Some(next) if dialect.keyword_eq(next.text, "As") => Some((keyword, word.span)),
            Some(_) => None,
        }
    })
}

fn matching_paren(line: &[&Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in line.iter().enumerate().skip(open) {
        if token.is_punct('(') {
            depth += 1;
        } else if token.is_punct(')') {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn close_block(
    open: &mut Vec<OpenBlock>,
    keyword: &'static str,
    span: Span,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match open.iter().rposition(|b| b.keyword == keyword) {
        Some(pos) => {
            for block in &open[pos + 1..] {
                diagnostics.push(not_terminated(block));
            }
            open.truncate(pos);
        }
        None => diagnostics.push(
            Diagnostic::error(format!("'End {}' without matching '{}'", keyword, keyword)).at(span),
        ),
    }
}
