//! Ad hoc address search.

use std::path::Path;

use rathunter_core::{
    filter_aged, filter_by_address, AppConfig, AugmentedRecord, FilterError, OutputPaths,
    RunContext,
};

use crate::pipeline;

#[derive(Debug, Clone)]
pub(crate) struct SearchRequest {
    pub pattern: String,
    pub in_stock: bool,
    pub max_age: Option<i64>,
    pub csv: Option<String>,
}

/// Address and status filter, then the optional freshness cut.
pub(crate) fn select_matches(
    table: &[AugmentedRecord],
    pattern: &str,
    in_stock: bool,
    max_age: Option<i64>,
) -> Result<Vec<AugmentedRecord>, FilterError> {
    let matched = filter_by_address(table, pattern, in_stock)?;
    Ok(match max_age {
        Some(max_minutes) => filter_aged(&matched, max_minutes),
        None => matched,
    })
}

pub(crate) async fn run_search(
    config: &AppConfig,
    paths: &OutputPaths,
    ctx: &RunContext,
    request: &SearchRequest,
    offline: Option<&Path>,
) -> anyhow::Result<()> {
    let table = pipeline::load_table(config, paths, ctx, offline).await?;
    let matches = select_matches(&table, &request.pattern, request.in_stock, request.max_age)?;

    println!(
        "{} of {} listings match '{}'",
        matches.len(),
        table.len(),
        request.pattern
    );
    for row in &matches {
        println!("{}", pipeline::summary_line(row));
    }

    if let Some(file_name) = &request.csv {
        let written = rathunter_export::export_csv(&matches, &paths.result_path(file_name))?;
        println!("wrote {}", written.display());
    }

    Ok(())
}
