//! sheetscope - stylesheet resolution and scoped adoption
//!
//! Loads each stylesheet identifier at most once, shares the resulting
//! handle with every requester, and adopts handles into document and
//! shadow-root scopes in request order.

pub mod adopt;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod report;
pub mod scope;
pub mod ui;

pub use adopt::{AdoptConfig, Adoption};
pub use cache::{LoadState, SheetCache, SheetHandle};
pub use error::{SheetScopeError, SheetScopeResult};
