//! Backend errors.
//!
//! These are configuration errors: they describe a request no backend can
//! serve, never a property of the submitted source. Source problems are
//! reported as diagnostics.

use polyc_core::Language;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The language has no toolchain for the requested version.
    #[error("no {language} toolchain for language version {version}")]
    UnsupportedVersion { language: Language, version: String },

    /// No factory is registered under the language's canonical name.
    #[error("no backend registered for language '{name}'")]
    UnknownLanguage { name: String },

    /// The backend cannot produce the requested kind of output.
    #[error("{language} backend cannot produce {output}")]
    UnsupportedOutput {
        language: Language,
        output: &'static str,
    },

    /// A registered factory failed to build its backend.
    #[error("failed to construct {language} backend: {reason}")]
    Construction { language: Language, reason: String },
}
