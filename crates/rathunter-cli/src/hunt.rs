//! Saved-search runs: filter, export, and notify per search.

use std::path::Path;

use rathunter_core::{
    AppConfig, AugmentedRecord, OutputPaths, RunContext, SearchConfig, SearchesFile,
};
use rathunter_export::{dispatch, DispatchOutcome, Mailer, Recipients, SmtpMailer};

use crate::pipeline;
use crate::search::select_matches;

/// Picks the searches to run: one by name or slug, or all of them.
pub(crate) fn select_searches<'a>(
    file: &'a SearchesFile,
    only: Option<&str>,
) -> anyhow::Result<Vec<&'a SearchConfig>> {
    match only {
        Some(wanted) => {
            let search = file
                .find(wanted)
                .ok_or_else(|| anyhow::anyhow!("search '{wanted}' not found"))?;
            Ok(vec![search])
        }
        None => Ok(file.searches.iter().collect()),
    }
}

/// Matches for one saved search.
pub(crate) fn run_saved_search(
    table: &[AugmentedRecord],
    search: &SearchConfig,
) -> anyhow::Result<Vec<AugmentedRecord>> {
    let pattern = search.address_pattern();
    let matches = select_matches(
        table,
        &pattern,
        search.in_stock,
        Some(search.max_age_minutes),
    )?;
    tracing::info!(
        search = %search.name,
        pattern = %pattern,
        matches = matches.len(),
        "saved search complete"
    );
    Ok(matches)
}

/// Runs the saved searches from the configured YAML file.
///
/// Mail credentials are only loaded when emails will actually be sent, and
/// a missing credential fails the run before any search executes.
pub(crate) async fn run_hunt(
    config: &AppConfig,
    paths: &OutputPaths,
    ctx: &RunContext,
    only: Option<&str>,
    dry_run: bool,
    offline: Option<&Path>,
) -> anyhow::Result<()> {
    let file = rathunter_core::load_searches(&config.searches_path)?;
    let selected = select_searches(&file, only)?;

    let mailer = if dry_run {
        None
    } else {
        let mail_config = rathunter_core::load_mail_config()?;
        Some(SmtpMailer::new(&mail_config)?)
    };

    let table = pipeline::load_table(config, paths, ctx, offline).await?;

    run_searches(&table, &selected, mailer.as_ref(), ctx, paths).await
}

/// Runs each search in turn. A failing search is logged and the rest still
/// run; the error returned at the end names every search that failed.
pub(crate) async fn run_searches<M: Mailer>(
    table: &[AugmentedRecord],
    searches: &[&SearchConfig],
    mailer: Option<&M>,
    ctx: &RunContext,
    paths: &OutputPaths,
) -> anyhow::Result<()> {
    let mut failed = Vec::new();

    for search in searches {
        if let Err(err) = run_one(table, search, mailer, ctx, paths).await {
            tracing::error!(
                search = %search.name,
                error = %format!("{err:#}"),
                "saved search failed"
            );
            failed.push(search.name.as_str());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} saved searches failed: {}",
            failed.len(),
            searches.len(),
            failed.join(", ")
        )
    }
}

async fn run_one<M: Mailer>(
    table: &[AugmentedRecord],
    search: &SearchConfig,
    mailer: Option<&M>,
    ctx: &RunContext,
    paths: &OutputPaths,
) -> anyhow::Result<()> {
    let matches = run_saved_search(table, search)?;
    let written =
        rathunter_export::export_csv(&matches, &paths.result_path(&search.results_file_name()))?;
    println!(
        "{}: {} matches, wrote {}",
        search.name,
        matches.len(),
        written.display()
    );

    let Some(mailer) = mailer else {
        tracing::info!(search = %search.name, "dry run, not sending email");
        return Ok(());
    };

    let recipients = Recipients {
        to: search.to.clone(),
        cc: search.cc.clone(),
    };
    let metadata = ctx.metadata(&search.address_pattern());
    let outcome = dispatch(
        mailer,
        &matches,
        &metadata,
        &recipients,
        search.empty_notification,
    )
    .await?;
    if outcome == DispatchOutcome::Sent {
        println!("{}: email sent", search.name);
    }
    Ok(())
}
