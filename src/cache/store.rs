//! Stylesheet cache
//!
//! Memoizes one handle per identifier and the last failure per identifier.
//! The first request for an identifier stores a `Pending` handle and spawns
//! the load; every later request gets that same handle back.

use crate::cache::handle::{LoadFailure, LoadState, SheetHandle, Stylesheet};
use crate::cache::observer::{LoadObserver, LogObserver};
use crate::error::{LoadError, SheetScopeError, SheetScopeResult};
use crate::loader::SheetLoader;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::runtime::Handle;
use tracing::debug;

#[derive(Default)]
struct Entries {
    sheets: HashMap<String, SheetHandle>,
    failures: HashMap<String, LoadFailure>,
    loads_issued: u64,
}

struct CacheInner {
    loader: Arc<dyn SheetLoader>,
    runtime: Handle,
    observer: RwLock<Arc<dyn LoadObserver>>,
    entries: Mutex<Entries>,
}

/// Long-lived stylesheet cache
///
/// Cloning shares the same cache. Entries live until [`SheetCache::clear`]
/// is called or the last clone is dropped.
#[derive(Clone)]
pub struct SheetCache {
    inner: Arc<CacheInner>,
}

impl SheetCache {
    /// Create a cache that spawns loads on the current tokio runtime
    pub fn new(loader: Arc<dyn SheetLoader>) -> SheetScopeResult<Self> {
        let runtime = Handle::try_current().map_err(|_| SheetScopeError::NoRuntime)?;
        Ok(Self::with_runtime(loader, runtime))
    }

    /// Create a cache that spawns loads on `runtime`
    pub fn with_runtime(loader: Arc<dyn SheetLoader>, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                loader,
                runtime,
                observer: RwLock::new(Arc::new(LogObserver)),
                entries: Mutex::new(Entries::default()),
            }),
        }
    }

    /// Replace the observer used by [`SheetCache::resolve`]
    pub fn with_observer(self, observer: Arc<dyn LoadObserver>) -> Self {
        self.set_observer(observer);
        self
    }

    /// Replace the observer used by [`SheetCache::resolve`] on every clone
    ///
    /// Loads already in flight keep reporting to the observer they started with.
    pub fn set_observer(&self, observer: Arc<dyn LoadObserver>) {
        *self
            .inner
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = observer;
    }

    /// Name of the underlying loader
    pub fn loader_name(&self) -> &'static str {
        self.inner.loader.loader_name()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve with the cache's default observer
    pub fn resolve(&self, identifier: &str) -> SheetHandle {
        let observer = Arc::clone(
            &self
                .inner
                .observer
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        );
        self.resolve_with(identifier, &observer)
    }

    /// Resolve `identifier` to its handle, loading it on first use
    ///
    /// Never blocks. A new identifier gets a `Pending` handle immediately and
    /// `observer` hears about the outcome once the load settles. An identifier
    /// whose load already failed replays that failure to `observer` before
    /// returning the recorded handle.
    pub fn resolve_with(
        &self,
        identifier: &str,
        observer: &Arc<dyn LoadObserver>,
    ) -> SheetHandle {
        let mut entries = self.entries();

        if let Some(handle) = entries.sheets.get(identifier) {
            let handle = handle.clone();
            if !handle.is_failed() {
                debug!("Cache hit for {} ({})", identifier, handle.state());
                return handle;
            }

            let failure = entries.failures.get(identifier).cloned();
            drop(entries);

            if let Some(failure) = failure {
                debug!("Replaying failure for {}", identifier);
                observer.on_failed(&failure);
            }
            return handle;
        }

        let handle = SheetHandle::pending(identifier);
        entries
            .sheets
            .insert(identifier.to_string(), handle.clone());
        entries.loads_issued += 1;
        drop(entries);

        debug!(
            "Issuing {} load for {}",
            self.inner.loader.loader_name(),
            identifier
        );
        self.spawn_load(handle.clone(), Arc::clone(observer));
        handle
    }

    /// Resolve each identifier in order
    pub fn resolve_all<I, S>(
        &self,
        identifiers: I,
        observer: &Arc<dyn LoadObserver>,
    ) -> Vec<SheetHandle>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        identifiers
            .into_iter()
            .map(|identifier| self.resolve_with(identifier.as_ref(), observer))
            .collect()
    }

    fn spawn_load(&self, handle: SheetHandle, observer: Arc<dyn LoadObserver>) {
        let cache = self.clone();
        self.inner.runtime.spawn(async move {
            let result = cache.inner.loader.load(handle.identifier()).await;
            cache.settle(&handle, result, observer.as_ref());
        });
    }

    fn settle(
        &self,
        handle: &SheetHandle,
        result: Result<String, LoadError>,
        observer: &dyn LoadObserver,
    ) {
        let identifier = handle.identifier().to_string();
        let mut entries = self.entries();
        // A cleared cache no longer owns this handle; only the handle itself is updated
        let current = entries
            .sheets
            .get(&identifier)
            .is_some_and(|cached| SheetHandle::ptr_eq(cached, handle));

        match result {
            Ok(text) => {
                handle.set_state(LoadState::Loaded(Arc::new(Stylesheet::new(
                    identifier.as_str(),
                    text,
                ))));
                drop(entries);
                debug!("Loaded {}", identifier);
                observer.on_loaded(handle);
            }
            Err(error) => {
                let failure = LoadFailure::new(identifier.as_str(), error);
                if current {
                    entries.failures.insert(identifier.clone(), failure.clone());
                }
                handle.set_state(LoadState::Failed(failure.clone()));
                drop(entries);
                observer.on_failed(&failure);
            }
        }
    }

    /// Look up a handle without issuing a load
    pub fn get(&self, identifier: &str) -> Option<SheetHandle> {
        self.entries().sheets.get(identifier).cloned()
    }

    /// The recorded failure for `identifier`, if its load failed
    pub fn failure(&self, identifier: &str) -> Option<LoadFailure> {
        self.entries().failures.get(identifier).cloned()
    }

    /// Number of identifiers with a handle
    pub fn len(&self) -> usize {
        self.entries().sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of loads issued since creation or the last clear
    pub fn loads_issued(&self) -> u64 {
        self.entries().loads_issued
    }

    /// Drop every handle and failure record
    ///
    /// Loads already in flight still settle onto the handles they were
    /// issued for, but do not repopulate the cache.
    pub fn clear(&self) {
        let mut entries = self.entries();
        debug!(
            "Clearing {} cached stylesheets and {} failures",
            entries.sheets.len(),
            entries.failures.len()
        );
        *entries = Entries::default();
    }
}

impl fmt::Debug for SheetCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        f.debug_struct("SheetCache")
            .field("loader", &self.inner.loader.loader_name())
            .field("sheets", &entries.sheets.len())
            .field("failures", &entries.failures.len())
            .finish()
    }
}
