//! Compiler diagnostics.
//!
//! A backend reports every problem it finds as a [`Diagnostic`]; the
//! [`Diagnostics`] collection keeps them in report order and answers the
//! questions the orchestrator asks (any errors? how many warnings?).

use std::fmt;

use crate::Span;

/// A single message reported by a compiler backend.
///
/// # Examples
///
/// ```
/// use polyc_core::{Diagnostic, Span};
///
/// let diagnostic = Diagnostic::error("unclosed '{'")
///     .in_section("unit1")
///     .at(Span::point(3, 14));
///
/// assert_eq!(diagnostic.to_string(), "unit1:3:14: error: unclosed '{'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of this diagnostic.
    pub kind: DiagnosticKind,
    /// The message text.
    pub message: String,
    /// The source unit this diagnostic belongs to, if any.
    pub section: Option<String>,
    /// Where in the section the problem starts, when known.
    pub span: Option<Span>,
}

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Blocks production of a compiled module.
    Error,
    /// Informational; compilation still succeeds unless warnings are
    /// treated as errors.
    Warning,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            section: None,
            span: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, message)
    }

    /// Attach the name of the source unit.
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Attach a source location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    #[inline]
    pub fn is_warning(&self) -> bool {
        self.kind == DiagnosticKind::Warning
    }
}

impl fmt::Display for Diagnostic {
    /// Formats as `section:line:col: kind: message`, dropping the parts
    /// that are unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.section, self.span) {
            (Some(section), Some(span)) => write!(f, "{}:{}: ", section, span)?,
            (Some(section), None) => write!(f, "{}: ", section)?,
            (None, Some(span)) => write!(f, "{}: ", span)?,
            (None, None) => {}
        }
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic, keeping the error flag current.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` if any diagnostic is an error.
    ///
    /// Tracked on insert, so this never walks the collection.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_warning)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Turn every warning into an error, keeping report order.
    pub fn promote_warnings(&mut self) {
        for diagnostic in &mut self.diagnostics {
            if diagnostic.kind == DiagnosticKind::Warning {
                diagnostic.kind = DiagnosticKind::Error;
                self.has_errors = true;
            }
        }
    }

    /// Drop every warning.
    pub fn suppress_warnings(&mut self) {
        self.diagnostics.retain(Diagnostic::is_error);
    }

    /// Write each diagnostic on its own line.
    pub fn emit<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(writer, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(iter);
        diagnostics
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
