//! Serializable snapshots of handles and adoptions for CLI output

use crate::adopt::Adoption;
use crate::cache::{LoadState, SheetHandle};
use crate::scope::{ScopeId, ScopeRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of one handle
#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub identifier: String,
    /// "pending", "loaded" or "failed"
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl SheetReport {
    pub fn from_handle(handle: &SheetHandle) -> Self {
        let state = handle.state();
        let mut report = Self {
            identifier: handle.identifier().to_string(),
            state: state.as_label(),
            digest: None,
            bytes: None,
            settled_at: None,
            error: None,
            hint: None,
        };

        match state {
            LoadState::Pending => {}
            LoadState::Loaded(sheet) => {
                report.digest = Some(sheet.digest.clone());
                report.bytes = Some(sheet.len());
                report.settled_at = Some(sheet.loaded_at);
            }
            LoadState::Failed(failure) => {
                report.settled_at = Some(failure.failed_at);
                report.error = Some(failure.message());
                report.hint = failure.error.hint();
            }
        }

        report
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Adopted set of one scope after an adoption
#[derive(Debug, Clone, Serialize)]
pub struct ScopeReport {
    pub name: String,
    pub id: String,
    /// Whether the last adoption wrote this scope
    pub committed: bool,
    pub sheets: Vec<SheetReport>,
}

/// A scope the adoption could not write
#[derive(Debug, Clone, Serialize)]
pub struct ScopeFailure {
    pub scope: String,
    pub error: String,
}

/// Result of the `adopt` command
#[derive(Debug, Clone, Serialize)]
pub struct AdoptionReport {
    pub scopes: Vec<ScopeReport>,
    pub unadopted: Vec<SheetReport>,
    pub failed_scopes: Vec<ScopeFailure>,
}

impl AdoptionReport {
    /// Snapshot every live scope in `registry` alongside the adoption outcome
    pub fn new(registry: &ScopeRegistry, adoption: &Adoption) -> Self {
        let scopes = registry
            .iter()
            .map(|(id, scope)| ScopeReport {
                name: scope.name.clone(),
                id: id.to_string(),
                committed: adoption.committed.contains(&id),
                sheets: scope.adopted.iter().map(SheetReport::from_handle).collect(),
            })
            .collect();

        let failed_scopes = adoption
            .failed
            .iter()
            .map(|(id, err)| ScopeFailure {
                scope: scope_label(registry, *id),
                error: err.to_string(),
            })
            .collect();

        Self {
            scopes,
            unadopted: adoption
                .unadopted
                .iter()
                .map(SheetReport::from_handle)
                .collect(),
            failed_scopes,
        }
    }

    /// Every sheet in the report, adopted or not
    pub fn sheets(&self) -> impl Iterator<Item = &SheetReport> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.sheets.iter())
            .chain(self.unadopted.iter())
    }

    /// Number of failed sheets, counted once per identifier
    pub fn failed_count(&self) -> usize {
        let mut failed: Vec<&str> = self
            .sheets()
            .filter(|s| s.is_failed())
            .map(|s| s.identifier.as_str())
            .collect();
        failed.sort_unstable();
        failed.dedup();
        failed.len()
    }

    /// Number of distinct identifiers in the report
    pub fn total_count(&self) -> usize {
        let mut all: Vec<&str> = self.sheets().map(|s| s.identifier.as_str()).collect();
        all.sort_unstable();
        all.dedup();
        all.len()
    }
}

fn scope_label(registry: &ScopeRegistry, id: ScopeId) -> String {
    match registry.get(id) {
        Some(scope) => scope.name.clone(),
        None => id.to_string(),
    }
}
