use polyc_backend::BackendError;
use thiserror::Error;

/// Why a compilation could not be attempted.
///
/// Errors in the submitted source are not reported here; they come back as
/// diagnostics in a failed [`CompileResult`](crate::CompileResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("no source units to compile")]
    NoSources,

    /// No backend could be obtained for the language and version, or the
    /// backend refused the request outright.
    #[error(transparent)]
    Configuration(#[from] BackendError),
}
