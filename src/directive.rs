//! Reference directives embedded at the top of a source unit.
//!
//! A unit may open with lines of the form
//!
//! ```text
//! 'Reference System.Web.dll
//! //reference Newtonsoft.Json.dll
//! ```
//!
//! The prefix is matched case-insensitively, and the rest of the line is
//! the reference name, taken verbatim. Scanning stops at the first non-empty
//! line that is not a directive, so directives further down a file are
//! ordinary source text.

/// Recognized directive prefixes, lower-cased, including the trailing space.
const DIRECTIVE_PREFIXES: [&str; 2] = ["'reference ", "//reference "];

/// Iterate over the reference names declared by the leading directive lines
/// of `source`.
///
/// Lines are separated by `\r` or `\n`. Empty lines are skipped, so a
/// `\r\n` pair counts as a single break.
pub fn directives(source: &str) -> impl Iterator<Item = &str> {
    source
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map_while(directive_reference)
}

/// Collect the leading reference directives of `source`, in order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn scan_references(source: &str) -> Vec<&str> {
    directives(source).collect()
}

/// The reference named by `line`, if the line is a directive.
fn directive_reference(line: &str) -> Option<&str> {
    DIRECTIVE_PREFIXES.iter().find_map(|prefix| {
        let head = line.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| &line[prefix.len()..])
    })
}
