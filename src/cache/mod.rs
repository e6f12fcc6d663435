//! Stylesheet cache
//!
//! Memoizes load outcomes per identifier so each stylesheet is loaded at
//! most once for the lifetime of the cache.
//!
//! # Handle States
//!
//! | State | Payload | Description |
//! |-------|---------|-------------|
//! | Pending | none | Load issued, not settled |
//! | Loaded | `Stylesheet` | Load succeeded |
//! | Failed | `LoadFailure` | Load failed, replayed to later requesters |

pub mod handle;
pub mod observer;
mod store;

pub use handle::{LoadFailure, LoadState, SheetHandle, Stylesheet};
pub use observer::{FnObserver, LoadObserver, LogObserver};
pub use store::SheetCache;
