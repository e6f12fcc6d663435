//! Configuration schema for sheetscope
//!
//! Configuration is stored at `~/.config/sheetscope/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Stylesheet loader settings
    pub loader: LoaderConfig,

    /// Adoption defaults
    pub adopt: AdoptDefaults,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Stylesheet loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory relative identifiers resolve against (default: current directory)
    pub root: Option<PathBuf>,

    /// Allow `http://` and `https://` identifiers
    pub allow_http: bool,

    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,

    /// Largest stylesheet accepted, in bytes
    pub max_bytes: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: None,
            allow_http: true,
            http_timeout_secs: 30,
            max_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Adoption defaults for manifests
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdoptDefaults {
    /// Append to the default scope when a manifest lists no append targets
    pub append_default_scope: bool,

    /// Wait for loads to settle before reporting
    pub wait: bool,
}

impl Default for AdoptDefaults {
    fn default() -> Self {
        Self {
            append_default_scope: true,
            wait: true,
        }
    }
}
