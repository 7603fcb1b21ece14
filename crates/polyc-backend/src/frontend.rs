//! The built-in frontend backend.
//!
//! One implementation serves every declared language: the [`Dialect`]
//! table supplies the language specifics. The backend resolves the
//! option string, validates the reference list, lexes and
//! structure-checks every unit, and assembles a [`CompiledModule`] when no
//! error was reported.

use polyc_core::{Diagnostic, Diagnostics, Language};
use rustc_hash::FxHashSet;

use crate::dialect::Dialect;
use crate::error::BackendError;
use crate::lexer::tokenize;
use crate::module::{CompiledModule, DebugInfo, Declaration};
use crate::options::BackendOptions;
use crate::structure;
use crate::{Backend, BackendOutput, CompileFlags, CompileRequest};

/// Version tokens the tuned toolchains ship for.
const TUNED_VERSIONS: &[&str] = &["2.0", "3.5", "4.0"];

#[derive(Debug)]
pub struct FrontendBackend {
    dialect: &'static Dialect,
    version: Option<String>,
}

impl FrontendBackend {
    /// Build a tuned backend configured with a version token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::UnsupportedVersion`] when no toolchain
    /// exists for `version`.
    pub fn tuned(language: Language, version: &str) -> Result<Self, BackendError> {
        if !TUNED_VERSIONS.contains(&version) {
            return Err(BackendError::UnsupportedVersion {
                language,
                version: version.to_string(),
            });
        }
        Ok(Self {
            dialect: Dialect::for_language(language),
            version: Some(version.to_string()),
        })
    }

    /// Build a version-agnostic backend, as registered by name.
    pub fn generic(language: Language) -> Self {
        Self {
            dialect: Dialect::for_language(language),
            version: None,
        }
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    fn check_output_policy(&self, flags: CompileFlags) -> Result<(), BackendError> {
        if flags.contains(CompileFlags::GENERATE_EXECUTABLE) {
            return Err(BackendError::UnsupportedOutput {
                language: self.dialect.language,
                output: "an executable",
            });
        }
        if !flags.contains(CompileFlags::GENERATE_IN_MEMORY) {
            return Err(BackendError::UnsupportedOutput {
                language: self.dialect.language,
                output: "output on storage",
            });
        }
        Ok(())
    }
}

fn check_references(references: &[String], diagnostics: &mut Diagnostics) {
    let mut seen = FxHashSet::default();
    let mut reported = FxHashSet::default();
    for name in references {
        if name.trim().is_empty() {
            diagnostics.push(Diagnostic::error("empty reference name"));
        } else if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
            diagnostics.push(Diagnostic::warning(format!(
                "reference '{}' is listed more than once",
                name
            )));
        }
    }
}

impl Backend for FrontendBackend {
    fn language(&self) -> Language {
        self.dialect.language
    }

    fn version_token(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn is_reentrant(&self) -> bool {
        true
    }

    fn compile(&self, request: &CompileRequest<'_>) -> Result<BackendOutput, BackendError> {
        self.check_output_policy(request.flags)?;

        let mut diagnostics = Diagnostics::new();
        let options = BackendOptions::parse(request.options, self.dialect, &mut diagnostics);
        check_references(request.references, &mut diagnostics);

        let mut declarations = Vec::new();
        for unit in request.sources {
            if unit.text.trim().is_empty() {
                diagnostics.push(Diagnostic::warning("source unit is empty").in_section(&unit.name));
                continue;
            }

            let (tokens, mut unit_errors) = tokenize(&unit.text, self.dialect);
            let (declared, structure_errors) = structure::check(&tokens, self.dialect);
            unit_errors.extend(structure_errors);
            unit_errors.sort_by_key(|d| d.span);
            diagnostics.extend(unit_errors.into_iter().map(|d| d.in_section(&unit.name)));
            declarations.extend(declared.into_iter().map(|d| Declaration {
                name: d.name.to_string(),
                kind: d.kind,
                section: unit.name.clone(),
                span: d.span,
            }));
        }

        let call_level = request.flags.contains(CompileFlags::TREAT_WARNINGS_AS_ERRORS);
        if options.no_warn {
            diagnostics.suppress_warnings();
        } else if options.effective_warnings_as_errors(call_level) {
            diagnostics.promote_warnings();
        }

        let module = (!diagnostics.has_errors()).then(|| {
            let with_debug = options
                .debug
                .unwrap_or(request.flags.contains(CompileFlags::INCLUDE_DEBUG_INFORMATION));
            CompiledModule::new(
                self.dialect.language,
                self.version.as_deref(),
                request.sources,
                request.references,
                options,
                declarations,
                with_debug.then(|| DebugInfo::from_sources(request.sources)),
            )
        });

        Ok(BackendOutput {
            diagnostics,
            module,
        })
    }
}
