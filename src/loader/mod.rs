//! Stylesheet loaders
//!
//! Provides the load primitive the cache drives:
//! - Filesystem: relative paths and `file://` URLs
//! - HTTP: `http://` and `https://` via `ureq`
//! - Memory: fixed in-process outcomes

mod factory;
mod fs;
mod http;
mod memory;
mod sheet_loader;

pub use factory::{create_loader, SchemeLoader};
pub use fs::FsLoader;
pub use http::HttpLoader;
pub use memory::MemoryLoader;
pub use sheet_loader::{scheme_of, SheetLoader};
