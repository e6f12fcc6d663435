//! Filesystem stylesheet loader
//!
//! Identifiers are paths relative to a root directory, or absolute paths and
//! `file://` URLs that fall under that root.

use crate::error::LoadError;
use crate::loader::sheet_loader::SheetLoader;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Loads stylesheets from disk
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
    max_bytes: u64,
}

impl FsLoader {
    /// Create a loader rooted at `root`
    pub fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    /// Directory relative identifiers are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an identifier to a path, rejecting anything that escapes the root
    pub fn path_for(&self, identifier: &str) -> Result<PathBuf, LoadError> {
        if identifier.is_empty() {
            return Err(LoadError::invalid(identifier, "identifier cannot be empty"));
        }
        if identifier.contains('\0') {
            return Err(LoadError::invalid(identifier, "identifier contains a NUL byte"));
        }

        let raw = identifier.strip_prefix("file://").unwrap_or(identifier);
        let path = Path::new(raw);

        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(LoadError::invalid(identifier, "must not contain '..'"));
        }

        if !path.is_absolute() {
            return Ok(self.root.join(path));
        }
        if path.starts_with(&self.root) {
            Ok(path.to_path_buf())
        } else {
            Err(LoadError::invalid(identifier, "path is outside the loader root"))
        }
    }
}

#[async_trait]
impl SheetLoader for FsLoader {
    async fn load(&self, identifier: &str) -> Result<String, LoadError> {
        let path = self.path_for(identifier)?;
        debug!("Reading stylesheet {}", path.display());

        let metadata = fs::metadata(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound(identifier.to_string()),
            _ => LoadError::io(identifier, &e),
        })?;

        if !metadata.is_file() {
            return Err(LoadError::invalid(identifier, "not a regular file"));
        }
        if metadata.len() > self.max_bytes {
            return Err(LoadError::TooLarge {
                identifier: identifier.to_string(),
                limit: self.max_bytes,
            });
        }

        fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::io(identifier, &e))
    }

    fn loader_name(&self) -> &'static str {
        "filesystem"
    }
}
