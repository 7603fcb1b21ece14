//! Concurrency tests for the backend cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use polyc::{
    Backend, BackendCache, BackendError, BackendOutput, BackendRegistry, CompileRequest, Context,
    ContextConfig, Diagnostics, FrontendBackend, Language, Version,
};

const THREADS: usize = 16;

/// Registers a `jscript` factory that counts constructions and takes a
/// while to finish, so racing first requests overlap.
fn counting_registry(constructed: Arc<AtomicUsize>) -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register("jscript", move || {
        constructed.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(Arc::new(FrontendBackend::generic(Language::JScript)) as Arc<dyn Backend>)
    });
    registry
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_concurrent_first_access_constructs_once() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(BackendCache::new(counting_registry(Arc::clone(&constructed))));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_create(Language::JScript, Version::V4_0).unwrap()
            })
        })
        .collect();

    let entries: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(entries.iter().all(|e| Arc::ptr_eq(e, &entries[0])));

    let stats = cache.stats();
    assert_eq!(stats.constructions, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, THREADS as u64 - 1);
}

#[test]
fn test_concurrent_access_to_distinct_keys() {
    let cache = Arc::new(BackendCache::default());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let language = Language::ALL[i % Language::ALL.len()];
                barrier.wait();
                cache.get_or_create(language, Version::V4_0).unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), Language::ALL.len());
    assert_eq!(cache.stats().constructions, Language::ALL.len() as u64);
}

#[test]
fn test_failed_construction_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut registry = BackendRegistry::new();
    let counter = Arc::clone(&attempts);
    registry.register("cpp", move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(BackendError::Construction {
                language: Language::Cpp,
                reason: "toolchain busy".to_string(),
            })
        } else {
            Ok(Arc::new(FrontendBackend::generic(Language::Cpp)) as Arc<dyn Backend>)
        }
    });
    let cache = BackendCache::new(registry);

    let err = cache.get_or_create(Language::Cpp, Version::V2_0).unwrap_err();
    assert!(matches!(err, BackendError::Construction { .. }));
    assert!(!cache.contains(Language::Cpp, Version::V2_0));

    let entry = cache.get_or_create(Language::Cpp, Version::V2_0).unwrap();
    assert_eq!(entry.language(), Language::Cpp);
    assert!(cache.contains(Language::Cpp, Version::V2_0));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);

    let stats = cache.stats();
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.constructions, 1);
}

#[test]
fn test_independent_caches() {
    let first = Context::default();
    let second = Context::default();
    first
        .compile(&["class A { }"], Language::CSharp, Version::V4_0, "")
        .unwrap();
    assert_eq!(first.cache().len(), 1);
    assert!(second.cache().is_empty());
}

// =============================================================================
// Invocation gating
// =============================================================================

/// A backend that is not reentrant and records how many calls overlap.
struct Exclusive {
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl Backend for Exclusive {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn version_token(&self) -> Option<&str> {
        None
    }

    fn compile(&self, _request: &CompileRequest<'_>) -> Result<BackendOutput, BackendError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(5));
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(BackendOutput {
            diagnostics: Diagnostics::new(),
            module: None,
        })
    }
}

#[test]
fn test_non_reentrant_backend_is_serialized() {
    let backend = Arc::new(Exclusive {
        active: AtomicUsize::new(0),
        max_active: AtomicUsize::new(0),
    });
    let mut registry = BackendRegistry::new();
    let shared = Arc::clone(&backend);
    registry.register("cpp", move || Ok(Arc::clone(&shared) as Arc<dyn Backend>));

    let ctx = Arc::new(Context::with_registry(ContextConfig::default(), registry));
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let ctx = Arc::clone(&ctx);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                ctx.compile(&["int a;"], Language::Cpp, Version::V4_0, "")
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        let result = handle.join().unwrap();
        assert!(!result.is_success());
        assert_eq!(result.errors().count(), 1);
    }

    let entry = ctx.cache().get_or_create(Language::Cpp, Version::V4_0).unwrap();
    assert!(entry.is_serialized());
    assert_eq!(backend.max_active.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reentrant_backends_compile_concurrently() {
    let ctx = Arc::new(Context::default());
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let source = format!("class C{} {{ }}", i);
                ctx.compile(&[source], Language::CSharp, Version::V3_5, "")
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_success());
    }
    assert_eq!(ctx.cache().stats().constructions, 1);
}
