//! The result of one compilation.

use std::fmt;
use std::sync::Arc;

use polyc_backend::{BackendOutput, CompiledModule};
use polyc_core::{Diagnostic, Diagnostics};

/// Coarse classification of a [`CompileResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    SuccessWithWarnings,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Success => "success",
            Outcome::SuccessWithWarnings => "success with warnings",
            Outcome::Failed => "failed",
        })
    }
}

const NO_MODULE: &str = "backend produced no module";

/// Diagnostics, the module on success, and the inputs the backend was
/// actually given.
#[derive(Debug, Clone)]
pub struct CompileResult {
    diagnostics: Diagnostics,
    module: Option<Arc<CompiledModule>>,
    references: Vec<String>,
    options: String,
}

impl CompileResult {
    /// Wrap a backend's output. A module reported alongside errors is
    /// discarded, and a missing module with no errors gets one.
    pub(crate) fn new(output: BackendOutput, references: Vec<String>, options: String) -> Self {
        let BackendOutput {
            mut diagnostics,
            module,
        } = output;
        if module.is_none() && !diagnostics.has_errors() {
            diagnostics.push(Diagnostic::error(NO_MODULE));
        }
        let module = module
            .filter(|_| !diagnostics.has_errors())
            .map(Arc::new);
        Self {
            diagnostics,
            module,
            references,
            options,
        }
    }

    /// True when a module was produced and no error was reported.
    pub fn is_success(&self) -> bool {
        self.module.is_some()
    }

    pub fn outcome(&self) -> Outcome {
        match (self.is_success(), self.diagnostics.has_warnings()) {
            (false, _) => Outcome::Failed,
            (true, true) => Outcome::SuccessWithWarnings,
            (true, false) => Outcome::Success,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.errors()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.warnings()
    }

    pub fn module(&self) -> Option<&Arc<CompiledModule>> {
        self.module.as_ref()
    }

    pub fn into_module(self) -> Option<Arc<CompiledModule>> {
        self.module
    }

    /// The reference list passed to the backend, duplicates included.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// The composed option string passed to the backend.
    pub fn options(&self) -> &str {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyc_backend::BackendOptions;
    use polyc_core::{Language, SourceUnit};

    fn module() -> CompiledModule {
        CompiledModule::new(
            Language::Cpp,
            None,
            &[SourceUnit::new("unit1", "int x;")],
            &[],
            BackendOptions::default(),
            Vec::new(),
            None,
        )
    }

    fn result(diagnostics: Vec<Diagnostic>, module: Option<CompiledModule>) -> CompileResult {
        CompileResult::new(
            BackendOutput {
                diagnostics: diagnostics.into_iter().collect(),
                module,
            },
            Vec::new(),
            String::new(),
        )
    }

    #[test]
    fn outcomes() {
        assert_eq!(result(vec![], Some(module())).outcome(), Outcome::Success);
        assert_eq!(
            result(vec![Diagnostic::warning("w")], Some(module())).outcome(),
            Outcome::SuccessWithWarnings
        );
        assert_eq!(
            result(vec![Diagnostic::error("e")], None).outcome(),
            Outcome::Failed
        );
    }

    #[test]
    fn module_with_errors_is_dropped() {
        let r = result(vec![Diagnostic::error("e")], Some(module()));
        assert!(!r.is_success());
        assert!(r.module().is_none());
        assert_eq!(r.errors().count(), 1);
    }

    #[test]
    fn missing_module_without_errors_fails_with_an_error() {
        let r = result(vec![Diagnostic::warning("w")], None);
        assert_eq!(r.outcome(), Outcome::Failed);
        assert_eq!(r.diagnostics().error_count(), 1);
        assert_eq!(r.warnings().count(), 1);
        assert_eq!(r.errors().next().unwrap().message, "backend produced no module");

        let r = result(vec![Diagnostic::error("e")], None);
        assert_eq!(r.diagnostics().error_count(), 1);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::SuccessWithWarnings.to_string(), "success with warnings");
    }
}
