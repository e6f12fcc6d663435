//! Stylesheet handles and their load state
//!
//! A handle is created the first time an identifier is requested and is
//! shared by every later request for it. Its state moves from `Pending` to
//! either `Loaded` or `Failed` exactly once.

use crate::error::LoadError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// A loaded stylesheet payload
#[derive(Debug, Clone, Serialize)]
pub struct Stylesheet {
    /// Identifier the sheet was loaded from
    pub identifier: String,
    /// Raw stylesheet text
    pub text: String,
    /// First 12 hex chars of the SHA-256 of `text`
    pub digest: String,
    /// When the load settled
    pub loaded_at: DateTime<Utc>,
}

impl Stylesheet {
    /// Build a payload from loaded text
    pub fn new(identifier: impl Into<String>, text: String) -> Self {
        let digest = content_digest(&text);
        Self {
            identifier: identifier.into(),
            text,
            digest,
            loaded_at: Utc::now(),
        }
    }

    /// Size of the stylesheet text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the stylesheet text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..6])
}

/// A recorded load failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Identifier whose load failed
    pub identifier: String,
    /// The error reported by the loader
    pub error: LoadError,
    /// When the failure was recorded
    pub failed_at: DateTime<Utc>,
}

impl LoadFailure {
    pub fn new(identifier: impl Into<String>, error: LoadError) -> Self {
        Self {
            identifier: identifier.into(),
            error,
            failed_at: Utc::now(),
        }
    }

    /// Human-readable failure message
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Load state of a handle
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Load issued, not yet settled
    Pending,
    /// Load succeeded; the payload is valid
    Loaded(Arc<Stylesheet>),
    /// Load failed; the handle carries no usable payload
    Failed(LoadFailure),
}

impl LoadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Label used in reports
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

struct HandleInner {
    identifier: String,
    state: watch::Sender<LoadState>,
}

/// Shared reference to one stylesheet's load state
///
/// Cloning is cheap and yields the same handle: equality is identity, not
/// identifier comparison.
#[derive(Clone)]
pub struct SheetHandle {
    inner: Arc<HandleInner>,
}

impl SheetHandle {
    /// Create a handle in the `Pending` state
    pub(crate) fn pending(identifier: impl Into<String>) -> Self {
        let (state, _) = watch::channel(LoadState::Pending);
        Self {
            inner: Arc::new(HandleInner {
                identifier: identifier.into(),
                state,
            }),
        }
    }

    /// Identifier this handle was requested with
    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    /// Snapshot of the current state
    pub fn state(&self) -> LoadState {
        self.inner.state.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.borrow().is_pending()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.state.borrow().is_loaded()
    }

    pub fn is_failed(&self) -> bool {
        self.inner.state.borrow().is_failed()
    }

    /// The payload, only when loaded
    pub fn stylesheet(&self) -> Option<Arc<Stylesheet>> {
        match &*self.inner.state.borrow() {
            LoadState::Loaded(sheet) => Some(Arc::clone(sheet)),
            _ => None,
        }
    }

    /// Wait until the load settles and return the final state
    ///
    /// Returns immediately when the handle is already loaded or failed.
    pub async fn settled(&self) -> LoadState {
        let mut rx = self.inner.state.subscribe();
        let state = match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close while we wait
            Err(_) => self.state(),
        };
        state
    }

    /// Whether two handles are the same object
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub(crate) fn set_state(&self, state: LoadState) {
        self.inner.state.send_replace(state);
    }
}

impl PartialEq for SheetHandle {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl Eq for SheetHandle {}

impl fmt::Debug for SheetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetHandle")
            .field("identifier", &self.inner.identifier)
            .field("state", &self.inner.state.borrow().as_label())
            .finish()
    }
}
