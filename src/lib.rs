//! polyc: an in-memory compilation service for several source languages.
//!
//! A [`Context`] compiles source units in one of the supported
//! [`Language`]s at a [`Version`] tier into an in-memory library module.
//! Compiler backends are expensive, so the context keeps one per
//! `(language, version)` in a shared [`BackendCache`].
//!
//! ## Modules
//!
//! - [`directive`]: Reference directives at the top of a source unit
//! - [`references`]: Default reference lists per version
//! - [`options`]: Base option strings and their composition
//! - [`cache`]: The shared backend cache
//! - [`config`]: Context-wide settings
//! - [`context`]: The compile orchestrator
//! - [`result`]: Compilation results

pub mod cache;
pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod options;
pub mod references;
pub mod result;

pub use cache::{BackendCache, CacheStats, CachedBackend};
pub use config::ContextConfig;
pub use context::Context;
pub use directive::scan_references;
pub use error::CompileError;
pub use references::ReferencePolicy;
pub use result::{CompileResult, Outcome};

pub use polyc_backend::{
    Backend, BackendError, BackendOutput, BackendRegistry, CompileFlags, CompileRequest,
    CompiledModule, Declaration, DeclarationKind, FrontendBackend,
};
pub use polyc_core::{Diagnostic, DiagnosticKind, Diagnostics, Language, SourceUnit, Span, Version};
