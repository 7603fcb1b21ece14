//! End-to-end tests using `Context` as the entry point.
//!
//! These tests run complete programs from `test_scripts/` through the whole
//! pipeline: directive scanning, reference assembly, backend lookup, option
//! composition and compilation.

use polyc::references::{BASE_REFERENCES, EXTENDED_REFERENCES};
use polyc::{CompileError, Context, ContextConfig, Language, Outcome, SourceUnit, Version};
use std::path::PathBuf;

/// Load a test script from the test_scripts directory.
fn load_script(filename: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_scripts")
        .join(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn compile_script(
    filename: &str,
    language: Language,
    version: Version,
    extra: &str,
) -> polyc::CompileResult {
    let ctx = Context::default();
    let unit = SourceUnit::new(filename, load_script(filename));
    ctx.compile_units(&[unit], language, version, extra)
        .expect("Failed to obtain a backend")
}

fn defaults_with(version: Version, directives: &[&str]) -> Vec<String> {
    let mut expected: Vec<String> = BASE_REFERENCES.iter().map(|r| r.to_string()).collect();
    if version >= Version::V3_5 {
        expected.extend(EXTENDED_REFERENCES.iter().map(|r| r.to_string()));
    }
    expected.extend(directives.iter().map(|r| r.to_string()));
    expected
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_csharp_library() {
    let result = compile_script("greeter.cs", Language::CSharp, Version::V4_0, "");
    assert_eq!(result.outcome(), Outcome::Success, "{}", result.diagnostics());

    let module = result.module().unwrap();
    assert_eq!(module.language(), Language::CSharp);
    assert_eq!(module.version(), Some("4.0"));
    for name in ["Greetings", "Greeter", "IShape", "Color"] {
        assert!(module.declaration(name).is_some(), "missing {}", name);
    }
    let debug = module.debug_info().unwrap();
    assert_eq!(debug.sections[0].0, "greeter.cs");
}

#[test]
fn test_basic_library() {
    let result = compile_script("greeter.vb", Language::VisualBasic, Version::V3_5, "");
    assert_eq!(result.outcome(), Outcome::Success, "{}", result.diagnostics());

    let module = result.module().unwrap();
    assert!(module.declaration("Greeter").is_some());
    assert!(module.declaration("Program").is_some());
    assert_eq!(module.options().option_infer, Some(true));
    assert_eq!(module.options().option_explicit, Some(true));
}

#[test]
fn test_jscript_library() {
    let result = compile_script("greeter.js", Language::JScript, Version::V2_0, "");
    assert_eq!(result.outcome(), Outcome::Success, "{}", result.diagnostics());

    let module = result.module().unwrap();
    assert_eq!(module.version(), None);
    assert!(module.declaration("Greeter").is_some());
}

#[test]
fn test_cpp_library() {
    let result = compile_script("greeter.cpp", Language::Cpp, Version::V4_0, "");
    assert_eq!(result.outcome(), Outcome::Success, "{}", result.diagnostics());

    let module = result.module().unwrap();
    assert!(module.declaration("greetings").is_some());
    assert!(module.declaration("Point").is_some());
}

#[test]
fn test_minimal_unit_in_every_language() {
    let ctx = Context::default();
    let minimal = [
        (Language::CSharp, "class A { }"),
        (Language::VisualBasic, "Class A\nEnd Class"),
        (Language::JScript, "var a = 1;"),
        (Language::Cpp, "int a = 1;"),
    ];
    for (language, source) in minimal {
        let result = ctx.compile(&[source], language, Version::V4_0, "").unwrap();
        assert!(result.is_success(), "{}: {}", language, result.diagnostics());
        assert_eq!(result.errors().count(), 0);
        assert!(result.module().is_some());
    }
}

// =============================================================================
// Syntax errors
// =============================================================================

#[test]
fn test_csharp_syntax_error() {
    let result = compile_script("broken.cs", Language::CSharp, Version::V4_0, "");
    assert_eq!(result.outcome(), Outcome::Failed);
    assert!(result.module().is_none());

    let messages: Vec<&str> = result.errors().map(|d| d.message.as_str()).collect();
    assert!(messages.contains(&"unterminated string literal"), "{:?}", messages);
    assert!(result.errors().all(|d| d.section.as_deref() == Some("broken.cs")));
}

#[test]
fn test_basic_block_mismatch() {
    let result = compile_script("broken.vb", Language::VisualBasic, Version::V2_0, "");
    assert_eq!(result.outcome(), Outcome::Failed);

    let messages: Vec<&str> = result.errors().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "'Sub' is not terminated by 'End Sub'",
            "'End Function' without matching 'Function'"
        ]
    );
    let lines: Vec<_> = result.errors().map(|d| d.span.map(|s| s.line)).collect();
    assert_eq!(lines, [Some(2), Some(4)]);
}

#[test]
fn test_error_in_second_unit() {
    let ctx = Context::default();
    let result = ctx
        .compile(&["var ok = 1;", "var broken = (1;"], Language::JScript, Version::V4_0, "")
        .unwrap();
    assert!(!result.is_success());
    assert!(result.errors().all(|d| d.section.as_deref() == Some("unit2")));
}

// =============================================================================
// References
// =============================================================================

#[test]
fn test_directive_references_follow_defaults() {
    let ctx = Context::default();
    let source = "'Reference Foo.dll\n'Reference Bar.dll\nclass A { }";
    let result = ctx.compile(&[source], Language::CSharp, Version::V4_0, "").unwrap();
    assert_eq!(
        result.references(),
        defaults_with(Version::V4_0, &["Foo.dll", "Bar.dll"])
    );
}

#[test]
fn test_late_directive_is_ignored() {
    let result = compile_script("directives.vb", Language::VisualBasic, Version::V3_5, "");
    assert!(result.is_success(), "{}", result.diagnostics());
    assert_eq!(
        result.references(),
        defaults_with(Version::V3_5, &["Foo.dll", "Bar.dll"])
    );
    assert!(!result.references().iter().any(|r| r == "Ignored.dll"));
}

#[test]
fn test_extended_references_by_version() {
    let ctx = Context::default();
    for version in Version::ALL {
        let sources = [SourceUnit::new("unit1", "int x;")];
        assert_eq!(ctx.reference_list(&sources, version), defaults_with(version, &[]));
    }
}

#[test]
fn test_directives_across_units_in_input_order() {
    let ctx = Context::default();
    let result = ctx
        .compile(
            &[
                "//reference First.dll\nvar a;",
                "var b;",
                "//reference Second.dll\r\n//reference Third.dll\r\nvar c;",
            ],
            Language::JScript,
            Version::V2_0,
            "",
        )
        .unwrap();
    assert_eq!(
        result.references(),
        defaults_with(Version::V2_0, &["First.dll", "Second.dll", "Third.dll"])
    );
    assert_eq!(
        result.module().unwrap().references().len(),
        result.references().len()
    );
}

// =============================================================================
// Options and warnings
// =============================================================================

#[test]
fn test_option_composition() {
    let ctx = Context::default();
    assert_eq!(
        ctx.compose_options(Language::CSharp, Version::V4_0, ""),
        "/warnaserror- /optimize+"
    );
    assert_eq!(
        ctx.compose_options(Language::CSharp, Version::V4_0, "X Y"),
        "/warnaserror- /optimize+ X Y"
    );
    assert_eq!(
        ctx.compose_options(Language::VisualBasic, Version::V2_0, ""),
        "/warnaserror- /optionexplicit+"
    );
    assert_eq!(
        ctx.compose_options(Language::VisualBasic, Version::V4_0, ""),
        "/warnaserror- /optionexplicit+ /optioninfer+"
    );
}

#[test]
fn test_base_options_keep_warnings_non_fatal() {
    let ctx = Context::default();
    let result = ctx
        .compile(&["//reference System.dll\nclass A { }"], Language::CSharp, Version::V2_0, "")
        .unwrap();
    assert_eq!(result.outcome(), Outcome::SuccessWithWarnings);
    assert_eq!(
        result.warnings().next().unwrap().message,
        "reference 'System.dll' is listed more than once"
    );
}

#[test]
fn test_extra_option_makes_warnings_fatal() {
    let ctx = Context::default();
    let result = ctx
        .compile(
            &["//reference System.dll\nclass A { }"],
            Language::CSharp,
            Version::V2_0,
            "/warnaserror+",
        )
        .unwrap();
    assert_eq!(result.outcome(), Outcome::Failed);
    assert!(result.module().is_none());
}

#[test]
fn test_call_level_switch_applies_without_base_options() {
    let source = ["//reference System.dll\nvar a;"];

    let strict = Context::default();
    let result = strict.compile(&source, Language::JScript, Version::V4_0, "").unwrap();
    assert_eq!(result.outcome(), Outcome::Failed);

    let lenient = Context::new(ContextConfig::new().with_warnings_as_errors(false));
    let result = lenient.compile(&source, Language::JScript, Version::V4_0, "").unwrap();
    assert_eq!(result.outcome(), Outcome::SuccessWithWarnings);
}

#[test]
fn test_unknown_option_is_a_warning() {
    let ctx = Context::default();
    let result = ctx
        .compile(&["class A { }"], Language::CSharp, Version::V4_0, "/frobnicate")
        .unwrap();
    assert_eq!(result.outcome(), Outcome::SuccessWithWarnings);
    assert_eq!(result.options(), "/warnaserror- /optimize+ /frobnicate");
}

#[test]
fn test_debug_information_follows_config() {
    let ctx = Context::new(ContextConfig::new().with_debug_information(false));
    let result = ctx.compile(&["int a;"], Language::Cpp, Version::V4_0, "").unwrap();
    assert!(result.module().unwrap().debug_info().is_none());
}

// =============================================================================
// Configuration failures
// =============================================================================

#[test]
fn test_configuration_failures() {
    let ctx = Context::default();

    let err = ctx
        .compile(&["Class A\nEnd Class"], Language::VisualBasic, Version::V3_0, "")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "no vb toolchain for language version 3.0"
    );

    let none: [&str; 0] = [];
    let err = ctx.compile(&none, Language::JScript, Version::V4_0, "").unwrap_err();
    assert_eq!(err, CompileError::NoSources);

    let bare = Context::with_registry(ContextConfig::default(), polyc::BackendRegistry::new());
    let err = bare.compile(&["int a;"], Language::Cpp, Version::V4_0, "").unwrap_err();
    assert!(matches!(err, CompileError::Configuration(_)));
    assert!(bare.cache().is_empty());
}
