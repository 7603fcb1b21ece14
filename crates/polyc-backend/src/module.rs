//! The in-memory compiled module.
//!
//! A [`CompiledModule`] never touches storage. Its id is an xxh64 digest
//! of everything that went into the compilation, so two compilations of the
//! same input yield modules with the same id.

use polyc_core::{Language, SourceUnit, Span};
use rustc_hash::FxHashSet;
use xxhash_rust::xxh64::Xxh64;

use crate::options::BackendOptions;

/// What kind of entity a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Namespace,
    Module,
    Class,
    Struct,
    Interface,
    Enum,
    Function,
}

impl DeclarationKind {
    /// Map a declaration keyword of any dialect to its kind.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "namespace" | "package" => DeclarationKind::Namespace,
            "module" => DeclarationKind::Module,
            "struct" | "structure" | "union" => DeclarationKind::Struct,
            "interface" => DeclarationKind::Interface,
            "enum" => DeclarationKind::Enum,
            "function" | "sub" => DeclarationKind::Function,
            _ => DeclarationKind::Class,
        }
    }
}

/// A named declaration exposed by a compiled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// The source unit it was declared in.
    pub section: String,
    pub span: Span,
}

/// Debug information attached on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugInfo {
    /// Each section with its line count, in input order.
    pub sections: Vec<(String, usize)>,
}

impl DebugInfo {
    pub fn from_sources(sources: &[SourceUnit]) -> Self {
        Self {
            sections: sources
                .iter()
                .map(|unit| (unit.name.clone(), line_count(&unit.text)))
                .collect(),
        }
    }
}

/// Lines in `text`. `\r\n`, `\n` and a lone `\r` each end a line, the same
/// breaks diagnostic spans count.
fn line_count(text: &str) -> usize {
    let bytes = text.as_bytes();
    let breaks = bytes
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n')))
        .count();
    breaks + usize::from(!text.is_empty() && !text.ends_with(['\n', '\r']))
}

/// A compiled library module held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModule {
    id: u64,
    language: Language,
    version: Option<String>,
    references: Vec<String>,
    declarations: Vec<Declaration>,
    options: BackendOptions,
    debug_info: Option<DebugInfo>,
}

impl CompiledModule {
    /// Assemble a module. References are deduplicated, first occurrence kept.
    pub fn new(
        language: Language,
        version: Option<&str>,
        sources: &[SourceUnit],
        references: &[String],
        options: BackendOptions,
        declarations: Vec<Declaration>,
        debug_info: Option<DebugInfo>,
    ) -> Self {
        let mut seen = FxHashSet::default();
        let references: Vec<String> = references
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();

        let mut hasher = Xxh64::new(0);
        hasher.update(language.canonical_name().as_bytes());
        hasher.update(version.unwrap_or_default().as_bytes());
        for name in &references {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
        }
        hasher.update(format!("{:?}", options).as_bytes());
        for unit in sources {
            hasher.update(unit.text.as_bytes());
            hasher.update(&[0]);
        }

        Self {
            id: hasher.digest(),
            language,
            version: version.map(str::to_string),
            references,
            declarations,
            options,
            debug_info,
        }
    }

    /// Content-derived module id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// A stable generated name, `module_<id in hex>`.
    pub fn name(&self) -> String {
        format!("module_{:016x}", self.id)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// References the module was compiled against, without duplicates.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Look up a declaration by name.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn options(&self) -> &BackendOptions {
        &self.options
    }

    pub fn debug_info(&self) -> Option<&DebugInfo> {
        self.debug_info.as_ref()
    }
}
