//! Loader factory
//!
//! Builds the scheme-routing loader used by the CLI from configuration.

use crate::config::schema::LoaderConfig;
use crate::error::{LoadError, SheetScopeError, SheetScopeResult};
use crate::loader::fs::FsLoader;
use crate::loader::http::HttpLoader;
use crate::loader::sheet_loader::{scheme_of, SheetLoader};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Routes each identifier to the loader for its scheme
///
/// Plain paths and `file://` go to the filesystem loader, `http(s)://` to
/// the HTTP loader when enabled. Anything else is rejected.
#[derive(Debug)]
pub struct SchemeLoader {
    fs: FsLoader,
    http: Option<HttpLoader>,
}

impl SchemeLoader {
    pub fn new(fs: FsLoader, http: Option<HttpLoader>) -> Self {
        Self { fs, http }
    }
}

#[async_trait]
impl SheetLoader for SchemeLoader {
    async fn load(&self, identifier: &str) -> Result<String, LoadError> {
        match scheme_of(identifier) {
            None | Some("file") => self.fs.load(identifier).await,
            Some(scheme @ ("http" | "https")) => match &self.http {
                Some(http) => http.load(identifier).await,
                None => Err(LoadError::UnsupportedScheme {
                    identifier: identifier.to_string(),
                    scheme: scheme.to_string(),
                }),
            },
            Some(scheme) => Err(LoadError::UnsupportedScheme {
                identifier: identifier.to_string(),
                scheme: scheme.to_string(),
            }),
        }
    }

    fn loader_name(&self) -> &'static str {
        if self.http.is_some() {
            "filesystem+http"
        } else {
            "filesystem"
        }
    }
}

/// Create the loader described by `config`
///
/// # Returns
/// * `Ok(Arc<dyn SheetLoader>)` - A shared loader ready for a `SheetCache`
/// * `Err` - If no root is configured and the current directory is unreadable
pub fn create_loader(config: &LoaderConfig) -> SheetScopeResult<Arc<dyn SheetLoader>> {
    let root = match &config.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()
            .map_err(|e| SheetScopeError::io("getting current directory", e))?,
    };

    let fs = FsLoader::new(root, config.max_bytes);
    let http = config.allow_http.then(|| {
        HttpLoader::new(
            Duration::from_secs(config.http_timeout_secs),
            config.max_bytes,
        )
    });

    Ok(Arc::new(SchemeLoader::new(fs, http)))
}
