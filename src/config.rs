//! Context-wide compilation settings.

use polyc_backend::CompileFlags;

use crate::references::ReferencePolicy;

/// Settings applied to every compilation a [`Context`](crate::Context)
/// runs.
///
/// Output always stays in memory and is never an executable; those two are
/// not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    pub references: ReferencePolicy,
    /// Call-level warnings-as-errors switch. An explicit `/warnaserror`
    /// option in the option string takes precedence.
    pub treat_warnings_as_errors: bool,
    pub include_debug_information: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            references: ReferencePolicy::default(),
            treat_warnings_as_errors: true,
            include_debug_information: true,
        }
    }
}

impl ContextConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_references(mut self, references: ReferencePolicy) -> Self {
        self.references = references;
        self
    }

    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.treat_warnings_as_errors = enabled;
        self
    }

    pub fn with_debug_information(mut self, enabled: bool) -> Self {
        self.include_debug_information = enabled;
        self
    }

    /// The flags handed to every backend invocation.
    pub fn flags(&self) -> CompileFlags {
        let mut flags = CompileFlags::GENERATE_IN_MEMORY;
        flags.set(CompileFlags::INCLUDE_DEBUG_INFORMATION, self.include_debug_information);
        flags.set(CompileFlags::TREAT_WARNINGS_AS_ERRORS, self.treat_warnings_as_errors);
        flags
    }
}
