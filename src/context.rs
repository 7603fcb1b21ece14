//! The compile orchestrator.
//!
//! A `Context` owns the backend cache and the context-wide settings. Each
//! compilation assembles the reference list, obtains the cached backend,
//! composes the option string and invokes the backend. The context holds
//! no per-compilation state, so one instance can serve any number of
//! threads.
//!
//! # Example
//!
//! ```ignore
//! use polyc::{Context, Language, Version};
//!
//! let ctx = Context::default();
//! let result = ctx.compile(
//!     &["'Reference System.Web.dll\nPublic Class Foo\nEnd Class"],
//!     Language::VisualBasic,
//!     Version::V3_5,
//!     "",
//! )?;
//!
//! assert!(result.is_success());
//! assert!(result.references().iter().any(|r| r == "System.Web.dll"));
//! ```

use polyc_backend::{BackendRegistry, CompileRequest};
use polyc_core::{Language, SourceUnit, Version};
use tracing::{debug, info};

use crate::cache::BackendCache;
use crate::config::ContextConfig;
use crate::error::CompileError;
use crate::options::{base_options, compose_options};
use crate::result::CompileResult;

#[derive(Debug)]
pub struct Context {
    config: ContextConfig,
    cache: BackendCache,
}

impl Context {
    /// A context with the built-in backends registered.
    pub fn new(config: ContextConfig) -> Self {
        Self::with_registry(config, BackendRegistry::with_builtins())
    }

    /// A context whose non-tuned languages are served by `registry`.
    pub fn with_registry(config: ContextConfig, registry: BackendRegistry) -> Self {
        Self {
            config,
            cache: BackendCache::new(registry),
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn cache(&self) -> &BackendCache {
        &self.cache
    }

    /// The references a compilation of `sources` at `version` receives.
    pub fn reference_list(&self, sources: &[SourceUnit], version: Version) -> Vec<String> {
        self.config.references.assemble(version, sources)
    }

    /// The option string a compilation receives: the language's base
    /// options followed by `extra`.
    pub fn compose_options(&self, language: Language, version: Version, extra: &str) -> String {
        compose_options(base_options(language, version), extra)
    }

    /// Compile source strings. Units are named `unit1`, `unit2`, ... in
    /// input order.
    ///
    /// # Errors
    ///
    /// See [`compile_units`](Self::compile_units).
    pub fn compile<S: AsRef<str>>(
        &self,
        sources: &[S],
        language: Language,
        version: Version,
        extra_options: &str,
    ) -> Result<CompileResult, CompileError> {
        self.compile_units(&SourceUnit::numbered(sources), language, version, extra_options)
    }

    /// Compile named source units into an in-memory library module.
    ///
    /// Problems in the source come back as diagnostics in the result.
    ///
    /// # Errors
    ///
    /// - [`CompileError::NoSources`] if `sources` is empty
    /// - [`CompileError::Configuration`] if no backend can be obtained for
    ///   `(language, version)` or the backend refuses the request
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile_units(
        &self,
        sources: &[SourceUnit],
        language: Language,
        version: Version,
        extra_options: &str,
    ) -> Result<CompileResult, CompileError> {
        if sources.is_empty() {
            return Err(CompileError::NoSources);
        }

        let references = {
            #[cfg(feature = "profiling")]
            profiling::scope!("scan");
            self.reference_list(sources, version)
        };

        let backend = {
            #[cfg(feature = "profiling")]
            profiling::scope!("lookup");
            self.cache.get_or_create(language, version)?
        };
        let options = self.compose_options(language, version, extra_options);
        debug!(
            %language,
            %version,
            units = sources.len(),
            references = references.len(),
            options = %options,
            "invoking backend"
        );

        let output = {
            #[cfg(feature = "profiling")]
            profiling::scope!("invoke");
            backend.invoke(&CompileRequest {
                sources,
                references: &references,
                options: &options,
                flags: self.config.flags(),
            })?
        };

        let result = CompileResult::new(output, references, options);
        info!(
            %language,
            %version,
            outcome = %result.outcome(),
            errors = result.diagnostics().error_count(),
            warnings = result.diagnostics().warning_count(),
            "compilation finished"
        );
        Ok(result)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}
