//! Stylesheet load primitive
//!
//! Provides a trait for fetching stylesheet text that can be implemented
//! by different backends (filesystem, HTTP, in-memory).

use crate::error::LoadError;
use async_trait::async_trait;

/// Abstract stylesheet source
///
/// The cache calls `load` at most once per identifier and records the
/// outcome. Implementations must not cache on their own.
#[async_trait]
pub trait SheetLoader: Send + Sync {
    /// Fetch the stylesheet text for `identifier`
    async fn load(&self, identifier: &str) -> Result<String, LoadError>;

    /// Get the human-readable loader name for display
    fn loader_name(&self) -> &'static str;
}

/// Extract the URL scheme of an identifier, if it has one
///
/// `https://cdn/a.css` yields `https`; `theme/a.css` yields `None`.
pub fn scheme_of(identifier: &str) -> Option<&str> {
    let (scheme, _) = identifier.split_once("://")?;
    let valid = !scheme.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}
