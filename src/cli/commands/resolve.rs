//! Resolve command - load stylesheets and report their state

use super::{build_cache, print_sheet, settle_all};
use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::error::{SheetScopeError, SheetScopeResult};
use crate::report::SheetReport;
use crate::ui::{self, UiContext};
use std::collections::HashSet;
use tracing::info;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> SheetScopeResult<()> {
    let cache = build_cache(config)?;
    let handles: Vec<_> = args.identifiers.iter().map(|id| cache.resolve(id)).collect();

    settle_all(&handles).await;
    info!(
        "Resolved {} identifiers with {} loads",
        handles.len(),
        cache.loads_issued()
    );

    let reports: Vec<SheetReport> = handles.iter().map(SheetReport::from_handle).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let ctx = UiContext::detect();
        ui::section(&ctx, "Stylesheets");
        for report in &reports {
            print_sheet(&ctx, report);
        }
    }

    let total: HashSet<&str> = reports.iter().map(|r| r.identifier.as_str()).collect();
    let failed: HashSet<&str> = reports
        .iter()
        .filter(|r| r.is_failed())
        .map(|r| r.identifier.as_str())
        .collect();

    if args.strict && !failed.is_empty() {
        return Err(SheetScopeError::LoadsFailed {
            failed: failed.len(),
            total: total.len(),
        });
    }

    Ok(())
}
