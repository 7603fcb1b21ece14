//! Compiler backends for polyc.
//!
//! A [`Backend`] is an opaque capability: given source units, an option
//! string and a reference list it produces an in-memory [`CompiledModule`]
//! plus diagnostics. The orchestrator never looks inside one.
//!
//! ## Modules
//!
//! - [`error`]: Backend construction and invocation errors
//! - [`options`]: Option-string parsing shared by the built-in backends
//! - [`module`]: The in-memory compiled module
//! - [`dialect`]: Lexical and block rules per language
//! - [`lexer`]: Dialect-driven tokenizer
//! - [`structure`]: Delimiter and block checking, declaration collection
//! - [`frontend`]: The built-in frontend backend
//! - [`registry`]: Name-based backend factories

mod cursor;
pub mod dialect;
pub mod error;
pub mod frontend;
pub mod lexer;
pub mod module;
pub mod options;
pub mod registry;
pub mod structure;

pub use error::BackendError;
pub use frontend::FrontendBackend;
pub use module::{CompiledModule, DebugInfo, Declaration, DeclarationKind};
pub use options::BackendOptions;
pub use registry::{BackendFactory, BackendRegistry};

use bitflags::bitflags;
use polyc_core::{Diagnostics, Language, SourceUnit};

bitflags! {
    /// Output and diagnostic policy for one backend invocation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompileFlags: u8 {
        /// Produce a standalone executable instead of a library module.
        const GENERATE_EXECUTABLE = 1 << 0;
        /// Keep the result in memory rather than writing it to storage.
        const GENERATE_IN_MEMORY = 1 << 1;
        /// Attach debug information to the module.
        const INCLUDE_DEBUG_INFORMATION = 1 << 2;
        /// Call-level switch promoting warnings to errors.
        const TREAT_WARNINGS_AS_ERRORS = 1 << 3;
    }
}

/// Everything a backend needs for one compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    pub sources: &'a [SourceUnit],
    pub references: &'a [String],
    pub options: &'a str,
    pub flags: CompileFlags,
}

/// What a backend hands back for a request it accepted.
///
/// `module` is `None` exactly when `diagnostics` contains an error.
#[derive(Debug, Clone)]
pub struct BackendOutput {
    pub diagnostics: Diagnostics,
    pub module: Option<CompiledModule>,
}

impl BackendOutput {
    pub fn is_success(&self) -> bool {
        self.module.is_some()
    }
}

/// A compiler for one language, configured for one language version.
///
/// Instances are expensive to build and are shared across threads once
/// cached, hence the `Send + Sync` bound.
pub trait Backend: Send + Sync {
    /// The language this backend compiles.
    fn language(&self) -> Language;

    /// The version token the backend was configured with, if any.
    fn version_token(&self) -> Option<&str>;

    /// Whether `compile` may run on several threads at once.
    ///
    /// Backends that don't say so are invoked one call at a time.
    fn is_reentrant(&self) -> bool {
        false
    }

    /// Compile the request.
    ///
    /// Problems with the submitted source come back as diagnostics inside
    /// `Ok`. `Err` is reserved for requests the backend cannot serve at all.
    fn compile(&self, request: &CompileRequest<'_>) -> Result<BackendOutput, BackendError>;
}
