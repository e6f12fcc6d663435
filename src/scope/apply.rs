//! Assignment commit
//!
//! Writes each partition bucket into its scope, either appending to the
//! scope's current adopted set or replacing it.

use crate::cache::SheetHandle;
use crate::error::SheetScopeError;
use crate::scope::partition::ScopeBucket;
use crate::scope::registry::{AdoptionSink, ScopeId};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Which scopes keep their existing stylesheets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AppendTargets {
    /// Append to the default scope of the call, replace everywhere else
    #[default]
    DefaultScope,
    /// Append to exactly these scopes, replace everywhere else
    Scopes(HashSet<ScopeId>),
}

impl AppendTargets {
    /// Replace every scope's adopted set
    pub fn none() -> Self {
        Self::Scopes(HashSet::new())
    }

    /// Append to `scopes` only
    pub fn scopes(scopes: impl IntoIterator<Item = ScopeId>) -> Self {
        Self::Scopes(scopes.into_iter().collect())
    }

    /// Whether `scope` should be appended to
    pub fn contains(&self, scope: ScopeId, default_scope: Option<ScopeId>) -> bool {
        match self {
            Self::DefaultScope => default_scope == Some(scope),
            Self::Scopes(scopes) => scopes.contains(&scope),
        }
    }
}

/// Outcome of committing a set of buckets
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Scopes written, in commit order
    pub committed: Vec<ScopeId>,
    /// Scopes that could not be written
    pub failed: Vec<(ScopeId, SheetScopeError)>,
}

/// Commit `buckets` to `sink` in order
///
/// A scope that cannot be written is recorded in the report and skipped;
/// scopes committed before it stay committed.
pub fn apply<S>(
    sink: &mut S,
    buckets: Vec<ScopeBucket>,
    append: &AppendTargets,
    default_scope: Option<ScopeId>,
) -> ApplyReport
where
    S: AdoptionSink + ?Sized,
{
    let mut report = ApplyReport::default();

    for ScopeBucket { scope, sheets } in buckets {
        let sheets: Vec<SheetHandle> = if append.contains(scope, default_scope) {
            let Some(current) = sink.adopted(scope) else {
                warn!("Skipping {}: scope is no longer registered", scope);
                report
                    .failed
                    .push((scope, SheetScopeError::ScopeNotFound(scope)));
                continue;
            };
            debug!(
                "Appending {} stylesheets to {} ({} already adopted)",
                sheets.len(),
                scope,
                current.len()
            );
            current.iter().cloned().chain(sheets).collect()
        } else {
            debug!("Replacing {} with {} stylesheets", scope, sheets.len());
            sheets
        };

        match sink.set_adopted(scope, sheets) {
            Ok(()) => report.committed.push(scope),
            Err(e) => {
                warn!("Skipping {}: {}", scope, e);
                report.failed.push((scope, e));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::registry::ScopeRegistry;

    fn handle(id: &str) -> SheetHandle {
        SheetHandle::pending(id)
    }

    fn ids(registry: &ScopeRegistry, scope: ScopeId) -> Vec<String> {
        registry
            .adopted(scope)
            .unwrap()
            .iter()
            .map(|h| h.identifier().to_string())
            .collect()
    }

    #[test]
    fn append_extends_existing_set() {
        let mut registry = ScopeRegistry::new();
        let s = registry.register("s").unwrap();
        registry
            .set_adopted(s, vec![handle("a.css"), handle("b.css")])
            .unwrap();

        let buckets = vec![ScopeBucket {
            scope: s,
            sheets: vec![handle("c.css")],
        }];
        let report = apply(&mut registry, buckets, &AppendTargets::scopes([s]), None);

        assert_eq!(report.committed, [s]);
        assert_eq!(ids(&registry, s), ["a.css", "b.css", "c.css"]);
    }

    #[test]
    fn replace_discards_existing_set() {
        let mut registry = ScopeRegistry::new();
        let s = registry.register("s").unwrap();
        registry
            .set_adopted(s, vec![handle("a.css"), handle("b.css")])
            .unwrap();

        let buckets = vec![ScopeBucket {
            scope: s,
            sheets: vec![handle("c.css")],
        }];
        apply(&mut registry, buckets, &AppendTargets::none(), None);

        assert_eq!(ids(&registry, s), ["c.css"]);
    }

    #[test]
    fn default_target_appends_only_to_default_scope() {
        let mut registry = ScopeRegistry::new();
        let doc = registry.register("document").unwrap();
        let panel = registry.register("panel").unwrap();
        registry.set_adopted(doc, vec![handle("x.css")]).unwrap();
        registry.set_adopted(panel, vec![handle("y.css")]).unwrap();

        let buckets = vec![
            ScopeBucket {
                scope: doc,
                sheets: vec![handle("a.css")],
            },
            ScopeBucket {
                scope: panel,
                sheets: vec![handle("b.css")],
            },
        ];
        apply(&mut registry, buckets, &AppendTargets::DefaultScope, Some(doc));

        assert_eq!(ids(&registry, doc), ["x.css", "a.css"]);
        assert_eq!(ids(&registry, panel), ["b.css"]);
    }

    #[test]
    fn empty_replace_clears_scope() {
        let mut registry = ScopeRegistry::new();
        let s = registry.register("s").unwrap();
        registry.set_adopted(s, vec![handle("a.css")]).unwrap();

        let buckets = vec![ScopeBucket {
            scope: s,
            sheets: Vec::new(),
        }];
        apply(&mut registry, buckets, &AppendTargets::none(), Some(s));

        assert!(registry.adopted(s).unwrap().is_empty());
    }

    #[test]
    fn missing_scope_does_not_roll_back_others() {
        let mut registry = ScopeRegistry::new();
        let first = registry.register("first").unwrap();
        let gone = registry.register("gone").unwrap();
        let last = registry.register("last").unwrap();
        registry.remove(gone);

        let buckets = vec![
            ScopeBucket {
                scope: first,
                sheets: vec![handle("a.css")],
            },
            ScopeBucket {
                scope: gone,
                sheets: vec![handle("b.css")],
            },
            ScopeBucket {
                scope: last,
                sheets: vec![handle("c.css")],
            },
        ];
        let report = apply(&mut registry, buckets, &AppendTargets::none(), None);

        assert_eq!(report.committed, [first, last]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, gone);
        assert_eq!(ids(&registry, first), ["a.css"]);
        assert_eq!(ids(&registry, last), ["c.css"]);
    }

    #[test]
    fn missing_append_target_is_reported() {
        let mut registry = ScopeRegistry::new();
        let gone = registry.register("gone").unwrap();
        registry.remove(gone);

        let buckets = vec![ScopeBucket {
            scope: gone,
            sheets: vec![handle("a.css")],
        }];
        let report = apply(&mut registry, buckets, &AppendTargets::scopes([gone]), None);

        assert!(report.committed.is_empty());
        assert!(matches!(
            report.failed[0].1,
            SheetScopeError::ScopeNotFound(id) if id == gone
        ));
    }
}
