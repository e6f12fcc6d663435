//! Adoption manifest parsing
//!
//! A manifest is a TOML file naming the scopes of a page, the stylesheets
//! each scope already holds, and the stylesheets to adopt:
//!
//! ```toml
//! default_scope = "document"
//! append = ["document"]
//! sheets = ["a.css", { identifier = "b.css", scope = "panel" }]
//!
//! [[scope]]
//! name = "document"
//! adopted = ["base.css"]
//!
//! [[scope]]
//! name = "panel"
//! ```

use crate::cache::{LoadObserver, SheetCache};
use crate::config::schema::AdoptDefaults;
use crate::error::{SheetScopeError, SheetScopeResult};
use crate::scope::{AdoptionSink, AppendTargets, Request, ScopeId, ScopeRegistry};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed adoption manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdoptManifest {
    /// Scope bare requests go to
    #[serde(default)]
    pub default_scope: Option<String>,

    /// Scopes that keep their current stylesheets; absent means the configured default
    #[serde(default)]
    pub append: Option<Vec<String>>,

    /// Stylesheets to adopt, in order
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,

    /// Scopes of the page
    #[serde(default, rename = "scope")]
    pub scopes: Vec<ScopeEntry>,

    #[serde(skip)]
    path: PathBuf,
}

/// One `[[scope]]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeEntry {
    pub name: String,

    /// Stylesheets the scope holds before adoption
    #[serde(default)]
    pub adopted: Vec<String>,
}

/// One entry of `sheets`: a bare identifier or a table with a scope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SheetEntry {
    Bare(String),
    Scoped(ScopedSheet),
}

/// Table form of a `sheets` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopedSheet {
    pub identifier: String,

    /// Scope name; absent means the default scope
    #[serde(default)]
    pub scope: Option<String>,
}

/// A manifest turned into live scopes and requests
#[derive(Debug)]
pub struct AdoptionPlan {
    pub registry: ScopeRegistry,
    pub requests: Vec<Request>,
    pub default_scope: Option<ScopeId>,
    pub append: AppendTargets,
}

impl AdoptManifest {
    /// Parse a manifest from a TOML file on disk
    pub async fn from_file(path: &Path) -> SheetScopeResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            SheetScopeError::io(format!("reading manifest {}", path.display()), e)
        })?;
        Self::parse_at(&content, path)
    }

    /// Parse a manifest from a TOML string
    pub fn parse(content: &str) -> SheetScopeResult<Self> {
        Self::parse_at(content, Path::new("adopt.toml"))
    }

    fn parse_at(content: &str, path: &Path) -> SheetScopeResult<Self> {
        let mut manifest: Self = toml::from_str(content)
            .map_err(|e| SheetScopeError::manifest(path, e.to_string()))?;
        manifest.path = path.to_path_buf();
        Ok(manifest)
    }

    fn lookup(&self, registry: &ScopeRegistry, name: &str) -> SheetScopeResult<ScopeId> {
        registry.find(name).ok_or_else(|| {
            SheetScopeError::manifest(&self.path, format!("unknown scope '{}'", name))
        })
    }

    /// Register the manifest's scopes and turn its sheets into requests
    ///
    /// Each scope's initial stylesheets are resolved through `cache`, so they
    /// share handles with any later request for the same identifier.
    pub fn build(
        &self,
        cache: &SheetCache,
        defaults: &AdoptDefaults,
        observer: &Arc<dyn LoadObserver>,
    ) -> SheetScopeResult<AdoptionPlan> {
        let mut registry = ScopeRegistry::new();

        for entry in &self.scopes {
            let id = registry.register_unique(&entry.name).map_err(|e| match e {
                SheetScopeError::ScopeNameTaken(name) => {
                    SheetScopeError::manifest(&self.path, format!("scope '{}' declared twice", name))
                }
                other => other,
            })?;
            let initial = cache.resolve_all(&entry.adopted, observer);
            registry.set_adopted(id, initial)?;
        }

        let default_scope = self
            .default_scope
            .as_deref()
            .map(|name| self.lookup(&registry, name))
            .transpose()?;

        let append = match &self.append {
            Some(names) => AppendTargets::scopes(
                names
                    .iter()
                    .map(|name| self.lookup(&registry, name))
                    .collect::<SheetScopeResult<Vec<_>>>()?,
            ),
            None if defaults.append_default_scope => AppendTargets::DefaultScope,
            None => AppendTargets::none(),
        };

        let requests = self
            .sheets
            .iter()
            .map(|entry| match entry {
                SheetEntry::Bare(identifier) => Ok(Request::from(identifier.as_str())),
                SheetEntry::Scoped(ScopedSheet { identifier, scope }) => {
                    let scope = scope
                        .as_deref()
                        .map(|name| self.lookup(&registry, name))
                        .transpose()?;
                    Ok(Request::from((identifier.as_str(), scope)))
                }
            })
            .collect::<SheetScopeResult<Vec<_>>>()?;

        Ok(AdoptionPlan {
            registry,
            requests,
            default_scope,
            append,
        })
    }

    /// Path the manifest was read from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LogObserver;
    use crate::loader::MemoryLoader;

    const MANIFEST: &str = r#"
        default_scope = "document"
        append = ["document"]
        sheets = ["a.css", { identifier = "b.css", scope = "panel" }, { identifier = "c.css" }]

        [[scope]]
        name = "document"
        adopted = ["base.css"]

        [[scope]]
        name = "panel"
    "#;

    fn cache() -> SheetCache {
        SheetCache::new(Arc::new(MemoryLoader::new())).unwrap()
    }

    fn observer() -> Arc<dyn LoadObserver> {
        Arc::new(LogObserver)
    }

    #[test]
    fn parses_mixed_sheet_entries() {
        let manifest = AdoptManifest::parse(MANIFEST).unwrap();

        assert_eq!(manifest.default_scope.as_deref(), Some("document"));
        assert_eq!(manifest.scopes.len(), 2);
        assert_eq!(manifest.sheets[0], SheetEntry::Bare("a.css".to_string()));
        assert_eq!(
            manifest.sheets[1],
            SheetEntry::Scoped(ScopedSheet {
                identifier: "b.css".to_string(),
                scope: Some("panel".to_string()),
            })
        );
        assert_eq!(
            manifest.sheets[2],
            SheetEntry::Scoped(ScopedSheet {
                identifier: "c.css".to_string(),
                scope: None,
            })
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = AdoptManifest::parse("default = \"document\"").unwrap_err();
        assert!(matches!(err, SheetScopeError::ManifestInvalid { .. }));
    }

    #[test]
    fn rejects_misspelled_sheet_keys() {
        let err = AdoptManifest::parse(r#"sheets = [{ identifier = "b.css", scpoe = "panel" }]"#)
            .unwrap_err();
        assert!(matches!(err, SheetScopeError::ManifestInvalid { .. }));
    }

    #[tokio::test]
    async fn build_registers_scopes_and_requests() {
        let manifest = AdoptManifest::parse(MANIFEST).unwrap();
        let cache = cache();

        let plan = manifest
            .build(&cache, &AdoptDefaults::default(), &observer())
            .unwrap();

        let doc = plan.registry.find("document").unwrap();
        let panel = plan.registry.find("panel").unwrap();
        assert_eq!(plan.default_scope, Some(doc));
        assert_eq!(plan.append, AppendTargets::scopes([doc]));
        assert_eq!(plan.registry.adopted(doc).unwrap()[0].identifier(), "base.css");
        assert_eq!(plan.requests[1], Request::scoped("b.css", panel));
        assert_eq!(plan.requests[2].scope(), None);
    }

    #[tokio::test]
    async fn unknown_scope_is_rejected() {
        let manifest =
            AdoptManifest::parse(r#"sheets = [{ identifier = "a.css", scope = "nowhere" }]"#)
                .unwrap();

        let err = manifest
            .build(&cache(), &AdoptDefaults::default(), &observer())
            .unwrap_err();
        assert!(err.to_string().contains("unknown scope 'nowhere'"));
    }

    #[tokio::test]
    async fn duplicate_scope_is_rejected() {
        let manifest = AdoptManifest::parse(
            r#"
            [[scope]]
            name = "document"

            [[scope]]
            name = "document"
            "#,
        )
        .unwrap();

        let err = manifest
            .build(&cache(), &AdoptDefaults::default(), &observer())
            .unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[tokio::test]
    async fn append_falls_back_to_configured_default() {
        let manifest = AdoptManifest::parse(
            r#"
            default_scope = "document"

            [[scope]]
            name = "document"
            "#,
        )
        .unwrap();
        let defaults = AdoptDefaults {
            append_default_scope: false,
            ..AdoptDefaults::default()
        };

        let plan = manifest.build(&cache(), &defaults, &observer()).unwrap();
        assert_eq!(plan.append, AppendTargets::none());
    }
}
