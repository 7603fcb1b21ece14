//! Name-based backend factories.
//!
//! Languages without explicit tuning are constructed by looking their
//! canonical name up here. Hosts register additional or replacement
//! factories before handing the registry to a context.

use std::fmt;
use std::sync::Arc;

use polyc_core::Language;
use rustc_hash::FxHashMap;

use crate::error::BackendError;
use crate::frontend::FrontendBackend;
use crate::Backend;

/// Builds one backend instance.
pub type BackendFactory = Arc<dyn Fn() -> Result<Arc<dyn Backend>, BackendError> + Send + Sync>;

/// Factories keyed by lower-cased language name.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    factories: FxHashMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `jscript` and `cpp` backends.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for language in [Language::JScript, Language::Cpp] {
            registry.register(language.canonical_name(), move || {
                Ok(Arc::new(FrontendBackend::generic(language)) as Arc<dyn Backend>)
            });
        }
        registry
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Backend>, BackendError> + Send + Sync + 'static,
    {
        self.factories
            .insert(name.to_ascii_lowercase(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }

    /// Construct a backend by name.
    ///
    /// # Errors
    ///
    /// [`BackendError::UnknownLanguage`] when nothing is registered under
    /// `name`, or whatever the factory itself returns.
    pub fn create(&self, name: &str) -> Result<Arc<dyn Backend>, BackendError> {
        let factory = self
            .factories
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| BackendError::UnknownLanguage {
                name: name.to_string(),
            })?;
        factory()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("names", &self.names())
            .finish()
    }
}
