//! In-memory stylesheet loader
//!
//! Serves a fixed set of sheets and failures, and counts how often each
//! identifier was requested.

use crate::error::LoadError;
use crate::loader::sheet_loader::SheetLoader;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Loader backed by a map of identifier to outcome
#[derive(Debug, Default)]
pub struct MemoryLoader {
    entries: HashMap<String, Result<String, LoadError>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for `identifier`
    pub fn with_sheet(mut self, identifier: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(identifier.into(), Ok(text.into()));
        self
    }

    /// Fail every load of `identifier` with `error`
    pub fn with_failure(mut self, identifier: impl Into<String>, error: LoadError) -> Self {
        self.entries.insert(identifier.into(), Err(error));
        self
    }

    /// How many times `identifier` was loaded
    pub fn calls(&self, identifier: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .copied()
            .unwrap_or(0)
    }

    /// Total loads across all identifiers
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }
}

#[async_trait]
impl SheetLoader for MemoryLoader {
    async fn load(&self, identifier: &str) -> Result<String, LoadError> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(identifier.to_string())
            .or_insert(0) += 1;

        match self.entries.get(identifier) {
            Some(outcome) => outcome.clone(),
            None => Err(LoadError::NotFound(identifier.to_string())),
        }
    }

    fn loader_name(&self) -> &'static str {
        "memory"
    }
}
