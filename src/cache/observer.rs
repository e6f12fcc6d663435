//! Load notifications
//!
//! Observers are told when a load settles. Failures are also replayed
//! synchronously to the observer of every later request for the same
//! identifier.

use crate::cache::handle::{LoadFailure, SheetHandle};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Receives load outcomes
pub trait LoadObserver: Send + Sync {
    /// Called once when the load for `handle` succeeds
    fn on_loaded(&self, _handle: &SheetHandle) {}

    /// Called when a load fails, and again for each replay of that failure
    fn on_failed(&self, failure: &LoadFailure) {
        warn!("{}: {}", failure.identifier, failure.message());
    }
}

/// Default observer: ignores successes, logs failures and continues
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LoadObserver for LogObserver {}

/// Observer built from closures
///
/// A missing closure falls back to the default behaviour of [`LoadObserver`].
#[derive(Default)]
pub struct FnObserver {
    on_loaded: Option<Box<dyn Fn(&SheetHandle) + Send + Sync>>,
    on_failed: Option<Box<dyn Fn(&LoadFailure) + Send + Sync>>,
}

impl FnObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the success callback
    pub fn with_loaded(mut self, f: impl Fn(&SheetHandle) + Send + Sync + 'static) -> Self {
        self.on_loaded = Some(Box::new(f));
        self
    }

    /// Set the failure callback
    pub fn with_failed(mut self, f: impl Fn(&LoadFailure) + Send + Sync + 'static) -> Self {
        self.on_failed = Some(Box::new(f));
        self
    }

    pub fn into_shared(self) -> Arc<dyn LoadObserver> {
        Arc::new(self)
    }
}

impl LoadObserver for FnObserver {
    fn on_loaded(&self, handle: &SheetHandle) {
        if let Some(f) = &self.on_loaded {
            f(handle);
        }
    }

    fn on_failed(&self, failure: &LoadFailure) {
        match &self.on_failed {
            Some(f) => f(failure),
            None => LogObserver.on_failed(failure),
        }
    }
}

impl fmt::Debug for FnObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver")
            .field("on_loaded", &self.on_loaded.is_some())
            .field("on_failed", &self.on_failed.is_some())
            .finish()
    }
}
