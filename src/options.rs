//! Per-language base option strings and their composition with caller
//! extras.

use polyc_core::{Language, Version};

const CSHARP_OPTIONS: &str = "/warnaserror- /optimize+";
const BASIC_OPTIONS: &str = "/warnaserror- /optionexplicit+";
const BASIC_OPTIONS_WITH_INFER: &str = "/warnaserror- /optionexplicit+ /optioninfer+";

/// The options every compilation of `language` at `version` starts from.
///
/// Only the tuned languages carry base options.
pub fn base_options(language: Language, version: Version) -> &'static str {
    match language {
        Language::CSharp => CSHARP_OPTIONS,
        Language::VisualBasic if version >= Version::V3_5 => BASIC_OPTIONS_WITH_INFER,
        Language::VisualBasic => BASIC_OPTIONS,
        Language::JScript | Language::Cpp => "",
    }
}

/// Append caller-supplied `extra` options to `base`, separated by one space.
///
/// Empty extras leave `base` untouched, and an empty base yields `extra`
/// as-is.
pub fn compose_options(base: &str, extra: &str) -> String {
    match (base.is_empty(), extra.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => extra.to_string(),
        (false, false) => format!("{} {}", base, extra),
    }
}
