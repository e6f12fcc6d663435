//! Error types for sheetscope
//!
//! All fallible operations return `SheetScopeResult<T>`. Load failures use the
//! separate [`LoadError`] type because they are recorded in the cache and
//! replayed to every later requester, so they must be cheap to clone.

use crate::scope::ScopeId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sheetscope operations
pub type SheetScopeResult<T> = Result<T, SheetScopeError>;

/// All errors that can occur in sheetscope
#[derive(Error, Debug)]
pub enum SheetScopeError {
    // Runtime errors
    #[error("No tokio runtime available to drive stylesheet loads")]
    NoRuntime,

    // Scope errors
    #[error("Scope not registered: {0}")]
    ScopeNotFound(ScopeId),

    #[error("Scope name already registered: {0}")]
    ScopeNameTaken(String),

    #[error("Scope registry has no free slots left")]
    RegistryFull,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Manifest errors
    #[error("Invalid adoption manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    // Load errors
    #[error("{failed} of {total} stylesheet loads failed")]
    LoadsFailed { failed: usize, total: usize },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl SheetScopeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a manifest error
    pub fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ManifestInvalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NoRuntime => Some("Build the SheetCache from inside a tokio runtime"),
            Self::ConfigInvalid { .. } => Some("Run: sheetscope config init --force"),
            Self::LoadsFailed { .. } => Some("Re-run with -v to see each load failure"),
            _ => None,
        }
    }
}

/// Why a single stylesheet load failed
///
/// Stored in the failure cache and handed to every observer that asks for the
/// same identifier afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Stylesheet not found: {0}")]
    NotFound(String),

    #[error("Failed to read {identifier}: {reason}")]
    Io { identifier: String, reason: String },

    #[error("HTTP request for {identifier} failed: {reason}")]
    Http { identifier: String, reason: String },

    #[error("HTTP {status} for {identifier}")]
    Status { identifier: String, status: u16 },

    #[error("Invalid stylesheet identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("No loader handles '{identifier}' (scheme {scheme})")]
    UnsupportedScheme { identifier: String, scheme: String },

    #[error("Stylesheet {identifier} exceeds {limit} bytes")]
    TooLarge { identifier: String, limit: u64 },

    #[error("Stylesheet {identifier} rejected: {reason}")]
    Rejected { identifier: String, reason: String },
}

impl LoadError {
    /// Create an invalid identifier error
    pub fn invalid(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the failure
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedScheme { scheme, .. } if scheme.starts_with("http") => {
                Some("Enable HTTP loading with loader.allow_http = true")
            }
            Self::InvalidIdentifier { .. } => {
                Some("Use a path relative to loader.root or a file:// URL under it")
            }
            _ => None,
        }
    }

    /// Create an IO failure from a std error
    pub fn io(identifier: impl Into<String>, source: &std::io::Error) -> Self {
        Self::Io {
            identifier: identifier.into(),
            reason: source.to_string(),
        }
    }
}
