//! Core types shared by every polyc crate.
//!
//! ## Modules
//!
//! - [`language`]: The supported source languages and language-version tiers
//! - [`span`]: Source locations for diagnostics
//! - [`source`]: Named source-code units
//! - [`diagnostics`]: Compiler diagnostics and their collection

pub mod diagnostics;
pub mod language;
pub mod source;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use language::{Language, ParseLanguageError, ParseVersionError, Version};
pub use source::SourceUnit;
pub use span::Span;
