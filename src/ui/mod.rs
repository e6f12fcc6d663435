//! UI module for consistent CLI output
//!
//! Plain `console` styling with a symbol-based layout in interactive
//! terminals and bracketed status tags in CI.

mod context;
mod output;

pub use context::UiContext;
pub use output::{
    key_value, remark, section, step_error_detail, step_ok_detail, step_pending, step_warn,
    step_warn_hint,
};
