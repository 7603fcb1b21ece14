//! Option-string parsing for the built-in backends.
//!
//! Switches are whitespace separated and take one of the forms `/name`,
//! `/name+`, `/name-` or `/name:value`; `-` is accepted in place of the
//! leading `/`. When a switch repeats, the last occurrence wins.

use polyc_core::{Diagnostic, Diagnostics};

use crate::dialect::Dialect;

/// The resolved option set of one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendOptions {
    /// Explicit `/warnaserror±`. `None` defers to the call-level switch.
    pub warnings_as_errors: Option<bool>,
    pub optimize: bool,
    /// Explicit `/debug±`. `None` defers to the call-level flag.
    pub debug: Option<bool>,
    /// `/nowarn` drops every warning.
    pub no_warn: bool,
    /// Symbols from `/define:A;B`.
    pub defines: Vec<String>,
    pub option_explicit: Option<bool>,
    pub option_infer: Option<bool>,
    pub option_strict: Option<bool>,
}

/// A single switch split into its parts.
struct Switch<'a> {
    raw: &'a str,
    name: String,
    toggle: Option<bool>,
    value: Option<&'a str>,
}

impl<'a> Switch<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let body = raw.strip_prefix('/').or_else(|| raw.strip_prefix('-'))?;
        let (name, value) = match body.split_once(':') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let (name, toggle) = if value.is_some() {
            (name, None)
        } else if let Some(name) = name.strip_suffix('+') {
            (name, Some(true))
        } else if let Some(name) = name.strip_suffix('-') {
            (name, Some(false))
        } else {
            (name, None)
        };
        if name.is_empty() {
            return None;
        }
        Some(Self {
            raw,
            name: name.to_ascii_lowercase(),
            toggle,
            value,
        })
    }

    /// The switch as a boolean; a bare switch means "on".
    fn flag(&self) -> Option<bool> {
        match self.value {
            Some(_) => None,
            None => Some(self.toggle.unwrap_or(true)),
        }
    }
}

impl BackendOptions {
    /// Parse an option string, reporting switches the dialect does not
    /// understand as warnings.
    pub fn parse(options: &str, dialect: &Dialect, diagnostics: &mut Diagnostics) -> Self {
        let mut parsed = BackendOptions::default();

        for raw in options.split_whitespace() {
            let Some(switch) = Switch::parse(raw) else {
                diagnostics.push(unrecognized(raw));
                continue;
            };
            if !parsed.apply(&switch, dialect) {
                diagnostics.push(unrecognized(switch.raw));
            }
        }

        parsed
    }

    /// Returns `false` for a switch this dialect doesn't know.
    fn apply(&mut self, switch: &Switch<'_>, dialect: &Dialect) -> bool {
        match switch.name.as_str() {
            "warnaserror" => assign(&mut self.warnings_as_errors, switch),
            "debug" => assign(&mut self.debug, switch),
            "optimize" => match switch.flag() {
                Some(on) => {
                    self.optimize = on;
                    true
                }
                None => false,
            },
            "nowarn" => match switch.flag() {
                Some(on) => {
                    self.no_warn = on;
                    true
                }
                None => false,
            },
            "define" | "d" => match switch.value {
                Some(value) => {
                    self.defines.extend(
                        value
                            .split([';', ','])
                            .filter(|symbol| !symbol.is_empty())
                            .map(str::to_string),
                    );
                    true
                }
                None => false,
            },
            "optionexplicit" if dialect.basic_options => assign(&mut self.option_explicit, switch),
            "optioninfer" if dialect.basic_options => assign(&mut self.option_infer, switch),
            "optionstrict" if dialect.basic_options => assign(&mut self.option_strict, switch),
            _ => false,
        }
    }

    /// Resolve warnings-as-errors against the call-level switch.
    ///
    /// An explicit `/warnaserror±` in the option string wins.
    pub fn effective_warnings_as_errors(&self, call_level: bool) -> bool {
        self.warnings_as_errors.unwrap_or(call_level)
    }
}

fn assign(slot: &mut Option<bool>, switch: &Switch<'_>) -> bool {
    match switch.flag() {
        Some(on) => {
            *slot = Some(on);
            true
        }
        None => false,
    }
}

fn unrecognized(raw: &str) -> Diagnostic {
    Diagnostic::warning(format!("unrecognized option '{}' ignored", raw))
}
