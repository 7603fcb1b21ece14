//! Default reference assembly.
//!
//! Every compilation starts from a base set of framework references. From
//! [`Version::V3_5`] on, an extended set is appended. References declared
//! by directives in the submitted units follow, unit by unit.

use polyc_core::{SourceUnit, Version};

use crate::directive::directives;

pub const BASE_REFERENCES: &[&str] = &["System.dll", "System.Data.dll", "System.Xml.dll"];

pub const EXTENDED_REFERENCES: &[&str] = &[
    "System.Core.dll",
    "System.Xml.Linq.dll",
    "System.Data.DataSetExtensions.dll",
];

/// Which framework references a compilation receives before its own
/// directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePolicy {
    pub base: Vec<String>,
    pub extended: Vec<String>,
    /// First version that receives `extended`.
    pub extended_from: Version,
}

impl Default for ReferencePolicy {
    fn default() -> Self {
        Self {
            base: BASE_REFERENCES.iter().map(|r| r.to_string()).collect(),
            extended: EXTENDED_REFERENCES.iter().map(|r| r.to_string()).collect(),
            extended_from: Version::V3_5,
        }
    }
}

impl ReferencePolicy {
    /// A policy with no framework references at all.
    pub fn empty() -> Self {
        Self {
            base: Vec::new(),
            extended: Vec::new(),
            extended_from: Version::V3_5,
        }
    }

    /// The framework references for `version`.
    pub fn defaults_for(&self, version: Version) -> Vec<String> {
        let mut references = self.base.clone();
        if version >= self.extended_from {
            references.extend(self.extended.iter().cloned());
        }
        references
    }

    /// The full reference list: framework defaults, then each unit's
    /// directives in unit order.
    ///
    /// Duplicates are kept; a backend decides what to make of them.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn assemble(&self, version: Version, sources: &[SourceUnit]) -> Vec<String> {
        let mut references = self.defaults_for(version);
        for unit in sources {
            references.extend(directives(&unit.text).map(str::to_string));
        }
        references
    }
}
