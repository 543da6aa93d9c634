mod hunt;
mod logging;
mod pipeline;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "rathunter")]
#[command(about = "Find rapid antigen test stock near you")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the current listings and write the JSON snapshot.
    Fetch,
    /// Filter listings by an address pattern.
    Search {
        /// Case-insensitive regex matched against the address.
        #[arg(long)]
        pattern: String,
        /// Match sold-out listings instead of in-stock ones.
        #[arg(long, default_value_t = false)]
        out_of_stock: bool,
        /// Drop listings updated more than this many minutes ago.
        #[arg(long)]
        max_age: Option<i64>,
        /// Write the matches to this file name under the results directory.
        #[arg(long)]
        csv: Option<String>,
        /// Read listings from a local JSON array instead of the network.
        #[arg(long)]
        offline: Option<PathBuf>,
    },
    /// Run saved searches, export each to CSV, and email the results.
    Hunt {
        /// Only run the search with this name or slug.
        #[arg(long)]
        search: Option<String>,
        /// Export CSVs but send no email.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        #[arg(long)]
        offline: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match rathunter_core::load_app_config() {
        Ok(config) => config,
        Err(err) => {
            let err = anyhow::Error::from(err);
            logging::report_startup_failure(&logging::startup_root(), &err);
            return Err(err);
        }
    };
    let paths = config.output_paths();
    paths.ensure()?;
    logging::init(&config.log_level, &paths.log_file_path())?;

    tracing::debug!(?config, "configuration loaded");
    let ctx = rathunter_core::RunContext::from_clock(config.utc_offset, config.timezone_name.clone());

    match cli.command {
        Commands::Fetch => {
            let records = pipeline::fetch_records(&config, &paths, None).await?;
            println!(
                "fetched {} records into {}",
                records.len(),
                paths.snapshot_path().display()
            );
        }
        Commands::Search {
            pattern,
            out_of_stock,
            max_age,
            csv,
            offline,
        } => {
            let request = search::SearchRequest {
                pattern,
                in_stock: !out_of_stock,
                max_age,
                csv,
            };
            search::run_search(&config, &paths, &ctx, &request, offline.as_deref()).await?;
        }
        Commands::Hunt {
            search,
            dry_run,
            offline,
        } => {
            hunt::run_hunt(
                &config,
                &paths,
                &ctx,
                search.as_deref(),
                dry_run,
                offline.as_deref(),
            )
            .await?;
        }
    }

    Ok(())
}
