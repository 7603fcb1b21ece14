//! Named source-code units.

/// One source-code unit submitted for compilation.
///
/// The name only labels diagnostics; it is never resolved as a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Name anonymous units `unit1`, `unit2`, ... in input order.
    pub fn numbered<S: AsRef<str>>(sources: &[S]) -> Vec<SourceUnit> {
        sources
            .iter()
            .enumerate()
            .map(|(i, text)| SourceUnit::new(format!("unit{}", i + 1), text.as_ref()))
            .collect()
    }
}
