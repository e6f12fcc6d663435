//! Request partitioning
//!
//! Resolves every request through the cache and groups the handles by the
//! scope they should be adopted into.

use crate::cache::{LoadObserver, SheetCache, SheetHandle};
use crate::scope::registry::ScopeId;
use std::collections::HashMap;
use std::sync::Arc;

/// A stylesheet request: a bare identifier, or an identifier with its own scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Goes to the default scope, if any
    Identifier(String),
    /// Goes to `scope` when set, else to the default scope
    Scoped {
        identifier: String,
        scope: Option<ScopeId>,
    },
}

impl Request {
    /// Request `identifier` for a specific scope
    pub fn scoped(identifier: impl Into<String>, scope: ScopeId) -> Self {
        Self::Scoped {
            identifier: identifier.into(),
            scope: Some(scope),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Self::Identifier(identifier) | Self::Scoped { identifier, .. } => identifier,
        }
    }

    /// The request's own scope, ignoring any default
    pub fn scope(&self) -> Option<ScopeId> {
        match self {
            Self::Identifier(_) => None,
            Self::Scoped { scope, .. } => *scope,
        }
    }
}

impl From<&str> for Request {
    fn from(identifier: &str) -> Self {
        Self::Identifier(identifier.to_string())
    }
}

impl From<String> for Request {
    fn from(identifier: String) -> Self {
        Self::Identifier(identifier)
    }
}

impl<S: Into<String>> From<(S, ScopeId)> for Request {
    fn from((identifier, scope): (S, ScopeId)) -> Self {
        Self::scoped(identifier, scope)
    }
}

impl<S: Into<String>> From<(S, Option<ScopeId>)> for Request {
    fn from((identifier, scope): (S, Option<ScopeId>)) -> Self {
        Self::Scoped {
            identifier: identifier.into(),
            scope,
        }
    }
}

/// Handles destined for one scope, in request order
#[derive(Debug, Clone)]
pub struct ScopeBucket {
    pub scope: ScopeId,
    pub sheets: Vec<SheetHandle>,
}

/// Result of partitioning a request list
#[derive(Debug, Default)]
pub struct Partition {
    /// Buckets in first-seen scope order
    pub buckets: Vec<ScopeBucket>,
    /// Handles with no scope to go to, in request order
    pub unadopted: Vec<SheetHandle>,
}

impl Partition {
    fn bucket_mut(
        &mut self,
        index: &mut HashMap<ScopeId, usize>,
        scope: ScopeId,
    ) -> &mut ScopeBucket {
        let position = *index.entry(scope).or_insert_with(|| {
            self.buckets.push(ScopeBucket {
                scope,
                sheets: Vec::new(),
            });
            self.buckets.len() - 1
        });
        &mut self.buckets[position]
    }

    /// Total handles across buckets and the unadopted list
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.sheets.len()).sum::<usize>() + self.unadopted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve `requests` and bucket the handles by effective scope
///
/// The default scope, when given, always gets a bucket even if nothing is
/// requested for it, so committing the partition still touches that scope.
/// Repeated identifiers are kept: the same handle appears once per request.
pub fn partition<I>(
    cache: &SheetCache,
    requests: I,
    default_scope: Option<ScopeId>,
    observer: &Arc<dyn LoadObserver>,
) -> Partition
where
    I: IntoIterator,
    I::Item: Into<Request>,
{
    let mut partition = Partition::default();
    let mut index = HashMap::new();

    if let Some(scope) = default_scope {
        partition.bucket_mut(&mut index, scope);
    }

    for request in requests {
        let request = request.into();
        let target = request.scope().or(default_scope);
        let handle = cache.resolve_with(request.identifier(), observer);

        match target {
            Some(scope) => partition.bucket_mut(&mut index, scope).sheets.push(handle),
            None => partition.unadopted.push(handle),
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LogObserver;
    use crate::loader::MemoryLoader;
    use crate::scope::registry::ScopeRegistry;

    fn setup() -> (SheetCache, ScopeRegistry, Arc<dyn LoadObserver>) {
        let loader = Arc::new(
            MemoryLoader::new()
                .with_sheet("a.css", "a {}")
                .with_sheet("b.css", "b {}")
                .with_sheet("c.css", "c {}"),
        );
        let cache = SheetCache::new(loader).unwrap();
        (cache, ScopeRegistry::new(), Arc::new(LogObserver))
    }

    fn ids(handles: &[SheetHandle]) -> Vec<&str> {
        handles.iter().map(|h| h.identifier()).collect()
    }

    #[tokio::test]
    async fn bare_requests_go_to_default_scope() {
        let (cache, mut registry, observer) = setup();
        let doc = registry.register("document").unwrap();

        let result = partition(&cache, ["a.css", "b.css"], Some(doc), &observer);

        assert_eq!(result.buckets.len(), 1);
        assert_eq!(result.buckets[0].scope, doc);
        assert_eq!(ids(&result.buckets[0].sheets), ["a.css", "b.css"]);
        assert!(result.unadopted.is_empty());
    }

    #[tokio::test]
    async fn no_scope_means_unadopted() {
        let (cache, _, observer) = setup();

        let result = partition(&cache, ["a.css"], None, &observer);

        assert!(result.buckets.is_empty());
        assert_eq!(ids(&result.unadopted), ["a.css"]);
    }

    #[tokio::test]
    async fn scoped_request_without_scope_uses_default() {
        let (cache, mut registry, observer) = setup();
        let doc = registry.register("document").unwrap();

        let requests = vec![Request::from(("a.css", None::<ScopeId>))];
        let result = partition(&cache, requests, Some(doc), &observer);

        assert_eq!(ids(&result.buckets[0].sheets), ["a.css"]);
    }

    #[tokio::test]
    async fn buckets_follow_first_seen_order() {
        let (cache, mut registry, observer) = setup();
        let doc = registry.register("document").unwrap();
        let panel = registry.register("panel").unwrap();
        let dialog = registry.register("dialog").unwrap();

        let requests = vec![
            Request::scoped("a.css", dialog),
            Request::from("b.css"),
            Request::scoped("c.css", panel),
            Request::scoped("b.css", dialog),
        ];
        let result = partition(&cache, requests, Some(doc), &observer);

        let order: Vec<ScopeId> = result.buckets.iter().map(|b| b.scope).collect();
        assert_eq!(order, [doc, dialog, panel]);
        assert_eq!(ids(&result.buckets[1].sheets), ["a.css", "b.css"]);
    }

    #[tokio::test]
    async fn default_scope_bucket_exists_for_empty_requests() {
        let (cache, mut registry, observer) = setup();
        let doc = registry.register("document").unwrap();

        let result = partition(&cache, Vec::<Request>::new(), Some(doc), &observer);

        assert_eq!(result.buckets.len(), 1);
        assert!(result.buckets[0].sheets.is_empty());
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let (cache, mut registry, observer) = setup();
        let doc = registry.register("document").unwrap();

        let result = partition(&cache, ["a.css", "a.css"], Some(doc), &observer);

        let sheets = &result.buckets[0].sheets;
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0], sheets[1]);
        assert_eq!(cache.loads_issued(), 1);
    }

    #[tokio::test]
    async fn every_request_lands_exactly_once() {
        let (cache, mut registry, observer) = setup();
        let panel = registry.register("panel").unwrap();

        let requests = vec![
            Request::from("a.css"),
            Request::scoped("b.css", panel),
            Request::from("c.css"),
            Request::scoped("a.css", panel),
        ];
        let count = requests.len();
        let result = partition(&cache, requests, None, &observer);

        assert_eq!(result.len(), count);
        assert_eq!(ids(&result.unadopted), ["a.css", "c.css"]);
        assert_eq!(ids(&result.buckets[0].sheets), ["b.css", "a.css"]);
    }
}
