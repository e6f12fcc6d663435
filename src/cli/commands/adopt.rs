//! Adopt command - apply an adoption manifest and report each scope

use super::{build_cache, print_sheet, settle_all};
use crate::adopt::AdoptConfig;
use crate::cli::args::AdoptArgs;
use crate::config::Config;
use crate::error::{SheetScopeError, SheetScopeResult};
use crate::manifest::AdoptManifest;
use crate::report::AdoptionReport;
use crate::ui::{self, UiContext};
use tracing::{debug, info};

/// Execute the adopt command
pub async fn execute(args: AdoptArgs, config: &Config) -> SheetScopeResult<()> {
    let manifest = AdoptManifest::from_file(&args.manifest).await?;
    debug!(
        "Loaded manifest {} ({} scopes, {} sheets)",
        manifest.path().display(),
        manifest.scopes.len(),
        manifest.sheets.len()
    );

    let cache = build_cache(config)?;
    let adopt_config = AdoptConfig::default();
    let plan = manifest.build(&cache, &config.adopt, &adopt_config.observer)?;

    let mut registry = plan.registry;
    let adopt_config = adopt_config.with_append(plan.append);
    let adoption = cache.adopt(
        &mut registry,
        plan.requests,
        plan.default_scope,
        &adopt_config,
    );

    let wait = args.strict || (config.adopt.wait && !args.no_wait);
    if wait {
        let adopted = registry.iter().flat_map(|(_, scope)| scope.adopted.iter());
        settle_all(adopted.chain(adoption.unadopted.iter())).await;
    }
    info!(
        "Committed {} scopes, {} loads issued",
        adoption.committed.len(),
        cache.loads_issued()
    );

    let report = AdoptionReport::new(&registry, &adoption);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let failed = report.failed_count();
    if args.strict && failed > 0 {
        return Err(SheetScopeError::LoadsFailed {
            failed,
            total: report.total_count(),
        });
    }

    Ok(())
}

fn print_report(report: &AdoptionReport) {
    let ctx = UiContext::detect();

    for scope in &report.scopes {
        let title = if scope.committed {
            scope.name.clone()
        } else {
            format!("{} (untouched)", scope.name)
        };
        ui::section(&ctx, &title);
        if scope.sheets.is_empty() {
            ui::remark(&ctx, "no stylesheets");
        }
        for sheet in &scope.sheets {
            print_sheet(&ctx, sheet);
        }
    }

    if !report.unadopted.is_empty() {
        ui::section(&ctx, "Unadopted");
        ui::remark(&ctx, "No scope given and no default scope declared");
        for sheet in &report.unadopted {
            print_sheet(&ctx, sheet);
        }
    }

    for failure in &report.failed_scopes {
        ui::step_warn_hint(&ctx, &failure.scope, &failure.error);
    }

    println!();
    ui::key_value(&ctx, "stylesheets", &report.total_count().to_string());
    ui::key_value(&ctx, "failed", &report.failed_count().to_string());
}
