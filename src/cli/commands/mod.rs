//! CLI command implementations

pub mod adopt;
pub mod config;
pub mod resolve;

pub use adopt::execute as adopt;
pub use config::execute as config;
pub use resolve::execute as resolve;

use crate::cache::{SheetCache, SheetHandle};
use crate::config::Config;
use crate::error::SheetScopeResult;
use crate::loader::create_loader;
use crate::report::SheetReport;
use crate::ui::{self, UiContext};
use futures_util::future::join_all;

/// Build a cache over the configured loaders
fn build_cache(config: &Config) -> SheetScopeResult<SheetCache> {
    let loader = create_loader(&config.loader)?;
    SheetCache::new(loader)
}

/// Wait for every handle to leave `Pending`
async fn settle_all<'a>(handles: impl IntoIterator<Item = &'a SheetHandle>) {
    join_all(handles.into_iter().map(|handle| handle.settled())).await;
}

fn print_sheet(ctx: &UiContext, sheet: &SheetReport) {
    match (sheet.state, &sheet.error) {
        (_, Some(error)) => {
            ui::step_error_detail(ctx, &sheet.identifier, error);
            if let Some(hint) = sheet.hint {
                ui::remark(ctx, &format!("Hint: {}", hint));
            }
        }
        ("loaded", None) => {
            let detail = format!(
                "{} bytes, sha256:{}",
                sheet.bytes.unwrap_or_default(),
                sheet.digest.as_deref().unwrap_or("-")
            );
            ui::step_ok_detail(ctx, &sheet.identifier, &detail);
        }
        _ => ui::step_pending(ctx, &format!("{} (pending)", sheet.identifier)),
    }
}
