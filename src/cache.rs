//! The process-wide backend cache.
//!
//! Backends are expensive to construct, so each `(language, version)` pair
//! is built at most once and shared by every later compilation. Lookups take
//! a read lock. A miss upgrades to the write lock, re-checks, and constructs
//! while holding it, so concurrent first requests for the same key end up
//! with the same instance. Failed constructions are never stored: the next
//! request tries again.
//!
//! Backends that do not declare themselves reentrant are wrapped with a
//! per-instance gate, and calls into them are serialized.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use polyc_backend::{
    Backend, BackendError, BackendOutput, BackendRegistry, CompileRequest, FrontendBackend,
};
use polyc_core::{Language, Version};
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

// ============================================================================
// Cached entries
// ============================================================================

/// A cached backend instance together with its invocation gate.
pub struct CachedBackend {
    language: Language,
    version: Version,
    backend: Arc<dyn Backend>,
    /// Present for backends that are not reentrant.
    gate: Option<Mutex<()>>,
}

impl CachedBackend {
    fn new(language: Language, version: Version, backend: Arc<dyn Backend>) -> Self {
        let gate = (!backend.is_reentrant()).then(|| Mutex::new(()));
        Self {
            language,
            version,
            backend,
            gate,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Whether calls into this backend are serialized.
    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    /// Run one compilation, holding the gate for its duration if there is
    /// one.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn invoke(&self, request: &CompileRequest<'_>) -> Result<BackendOutput, BackendError> {
        let _guard = self.gate.as_ref().map(|gate| gate.lock());
        self.backend.compile(request)
    }
}

impl fmt::Debug for CachedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedBackend")
            .field("language", &self.language)
            .field("version", &self.version)
            .field("serialized", &self.is_serialized())
            .finish()
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// A snapshot of cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Successful constructions. Never exceeds the number of distinct keys.
    pub constructions: u64,
    pub failures: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    constructions: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ============================================================================
// Cache
// ============================================================================

type Entries = FxHashMap<Language, FxHashMap<Version, Arc<CachedBackend>>>;

/// Backends keyed by language, then by version.
///
/// CSharp and VisualBasic are tuned: their backends are built directly and
/// configured with the version's token. Every other language is looked up
/// in the [`BackendRegistry`] by canonical name, and one instance is cached
/// per requested version even though generic backends ignore it.
pub struct BackendCache {
    registry: BackendRegistry,
    entries: RwLock<Entries>,
    counters: Counters,
}

impl BackendCache {
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            entries: RwLock::new(FxHashMap::default()),
            counters: Counters::default(),
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Return the backend for `(language, version)`, constructing and
    /// caching it on first use.
    ///
    /// # Errors
    ///
    /// Returns the construction error when no backend can be built. Nothing
    /// is cached in that case.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn get_or_create(
        &self,
        language: Language,
        version: Version,
    ) -> Result<Arc<CachedBackend>, BackendError> {
        if let Some(entry) = lookup(&self.entries.read(), language, version) {
            Counters::bump(&self.counters.hits);
            debug!(%language, %version, "backend cache hit");
            return Ok(entry);
        }

        let mut entries = self.entries.write();
        if let Some(entry) = lookup(&entries, language, version) {
            // Another thread finished constructing while we waited.
            Counters::bump(&self.counters.hits);
            debug!(%language, %version, "backend cache hit after wait");
            return Ok(entry);
        }

        Counters::bump(&self.counters.misses);
        let backend = match self.construct(language, version) {
            Ok(backend) => backend,
            Err(err) => {
                Counters::bump(&self.counters.failures);
                warn!(%language, %version, error = %err, "backend construction failed");
                return Err(err);
            }
        };
        Counters::bump(&self.counters.constructions);

        let entry = Arc::new(CachedBackend::new(language, version, backend));
        entries
            .entry(language)
            .or_default()
            .insert(version, Arc::clone(&entry));
        info!(
            %language,
            %version,
            serialized = entry.is_serialized(),
            "backend constructed"
        );
        Ok(entry)
    }

    fn construct(&self, language: Language, version: Version) -> Result<Arc<dyn Backend>, BackendError> {
        #[cfg(feature = "profiling")]
        profiling::scope!("construct_backend");
        match language {
            Language::CSharp | Language::VisualBasic => {
                Ok(Arc::new(FrontendBackend::tuned(language, version.token())?))
            }
            Language::JScript | Language::Cpp => self.registry.create(language.canonical_name()),
        }
    }

    /// Whether a backend for `(language, version)` is cached.
    pub fn contains(&self, language: Language, version: Version) -> bool {
        lookup(&self.entries.read(), language, version).is_some()
    }

    /// Number of cached backend instances.
    pub fn len(&self) -> usize {
        self.entries.read().values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            constructions: self.counters.constructions.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for BackendCache {
    fn default() -> Self {
        Self::new(BackendRegistry::with_builtins())
    }
}

impl fmt::Debug for BackendCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendCache")
            .field("registry", &self.registry)
            .field("stats", &self.stats())
            .finish()
    }
}

fn lookup(entries: &Entries, language: Language, version: Version) -> Option<Arc<CachedBackend>> {
    entries
        .get(&language)
        .and_then(|versions| versions.get(&version))
        .cloned()
}
