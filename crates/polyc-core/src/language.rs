//! Supported source languages and language-version tiers.
//!
//! Both enums are small `Copy` keys. Together they identify one compiler
//! backend instance in the backend cache.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A source language the service can compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    /// The C-family language.
    CSharp,
    /// The Basic-family language.
    VisualBasic,
    /// The scripting language.
    JScript,
    /// The native language.
    Cpp,
}

impl Language {
    /// Every declared language, in declaration order.
    pub const ALL: [Language; 4] = [
        Language::CSharp,
        Language::VisualBasic,
        Language::JScript,
        Language::Cpp,
    ];

    /// The canonical name used to look a backend up by name.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::VisualBasic => "vb",
            Language::JScript => "jscript",
            Language::Cpp => "cpp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Error returned when a string names no declared language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language '{0}'")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.canonical_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseLanguageError(s.to_string()))
    }
}

/// A language-version tier.
///
/// Tiers are ordered, so policy thresholds can be written as
/// `version >= Version::V3_5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    V2_0,
    V3_0,
    V3_5,
    V4_0,
}

impl Version {
    /// Every tier, lowest first.
    pub const ALL: [Version; 4] = [Version::V2_0, Version::V3_0, Version::V3_5, Version::V4_0];

    /// The dotted `major.minor` token a backend is configured with.
    pub fn token(self) -> &'static str {
        match self {
            Version::V2_0 => "2.0",
            Version::V3_0 => "3.0",
            Version::V3_5 => "3.5",
            Version::V4_0 => "4.0",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.token())
    }
}

/// Error returned when a string names no version tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language version '{0}'")]
pub struct ParseVersionError(pub String);

impl FromStr for Version {
    type Err = ParseVersionError;

    /// Accepts `"3.5"` as well as `"v3.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);
        Version::ALL
            .into_iter()
            .find(|v| v.token() == token)
            .ok_or_else(|| ParseVersionError(s.to_string()))
    }
}
