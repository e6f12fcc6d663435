//! Scopes and stylesheet adoption
//!
//! A scope is a destination container (a document, a shadow root) holding
//! an ordered set of adopted stylesheets. Requests are partitioned by scope
//! and each bucket is then committed to its scope.

pub mod apply;
pub mod partition;
pub mod registry;

pub use apply::{apply, AppendTargets, ApplyReport};
pub use partition::{partition, Partition, Request, ScopeBucket};
pub use registry::{AdoptionSink, Scope, ScopeId, ScopeRegistry};
