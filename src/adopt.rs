//! Stylesheet adoption
//!
//! Ties the cache, the partitioner and the applier together: resolve a
//! request list, bucket it by scope, commit each bucket, and hand back
//! whatever could not be attributed to a scope.

use crate::cache::{LoadObserver, LogObserver, SheetCache, SheetHandle};
use crate::error::SheetScopeError;
use crate::scope::{apply, partition, AdoptionSink, AppendTargets, Request, ScopeId};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Per-call adoption settings
#[derive(Clone)]
pub struct AdoptConfig {
    /// Scopes whose existing stylesheets are kept
    pub append: AppendTargets,
    /// Receives load outcomes for every request in the call
    pub observer: Arc<dyn LoadObserver>,
}

impl Default for AdoptConfig {
    fn default() -> Self {
        Self {
            append: AppendTargets::DefaultScope,
            observer: Arc::new(LogObserver),
        }
    }
}

impl AdoptConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_append(mut self, append: AppendTargets) -> Self {
        self.append = append;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = observer;
        self
    }
}

impl fmt::Debug for AdoptConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdoptConfig")
            .field("append", &self.append)
            .finish_non_exhaustive()
    }
}

/// Outcome of one adoption call
#[derive(Debug, Default)]
pub struct Adoption {
    /// Handles with no scope, in request order
    pub unadopted: Vec<SheetHandle>,
    /// Scopes written, in commit order
    pub committed: Vec<ScopeId>,
    /// Scopes that could not be written
    pub failed: Vec<(ScopeId, SheetScopeError)>,
}

impl SheetCache {
    /// Resolve `requests` and adopt them into their scopes
    ///
    /// Each request goes to its own scope, else `default_scope`, else the
    /// returned `unadopted` list. Scopes in `config.append` keep their
    /// current stylesheets; every other touched scope is replaced. The
    /// default scope is always touched, even with no requests for it.
    ///
    /// Handles are committed whatever their load state: a scope may hold
    /// pending or failed handles, which carry no payload.
    pub fn adopt<S, I>(
        &self,
        sink: &mut S,
        requests: I,
        default_scope: Option<ScopeId>,
        config: &AdoptConfig,
    ) -> Adoption
    where
        S: AdoptionSink + ?Sized,
        I: IntoIterator,
        I::Item: Into<Request>,
    {
        let partition = partition(self, requests, default_scope, &config.observer);
        debug!(
            "Partitioned {} stylesheets into {} scopes ({} unadopted)",
            partition.len(),
            partition.buckets.len(),
            partition.unadopted.len()
        );

        let report = apply(sink, partition.buckets, &config.append, default_scope);

        Adoption {
            unadopted: partition.unadopted,
            committed: report.committed,
            failed: report.failed,
        }
    }
}
