//! Subscriber setup: terse lines on stderr, timestamped lines appended to
//! the log file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rathunter_core::OutputPaths;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Level used when the configured level is unavailable.
const FALLBACK_LEVEL: &str = "info";

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or the filter does not
/// parse.
pub(crate) fn init(default_level: &str, log_file: &Path) -> anyhow::Result<()> {
    subscriber(default_level, log_file)?.try_init()?;
    Ok(())
}

/// Logs a configuration failure to the default log file under `root`.
///
/// Used before a configured subscriber exists. Falls back to plain stderr if
/// the log directory cannot be prepared.
pub(crate) fn report_startup_failure(root: &Path, err: &anyhow::Error) {
    let paths = OutputPaths::under(root);
    let installed = paths
        .ensure()
        .map_err(anyhow::Error::from)
        .and_then(|()| init(FALLBACK_LEVEL, &paths.log_file_path()));
    if let Err(log_err) = installed {
        eprintln!("could not set up logging: {log_err:#}");
    }
    tracing::error!(error = %format!("{err:#}"), "failed to load configuration");
}

/// Root directory for startup logging, read the same way the config loader
/// reads it.
pub(crate) fn startup_root() -> PathBuf {
    std::env::var("RAT_HUNTER_ROOT").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

fn subscriber(
    default_level: &str,
    log_file: &Path,
) -> anyhow::Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", log_file.display()))?;

    Ok(tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "rathunter-logging-{name}-{}",
            std::process::id()
        ))
    }

    fn scratch_paths(name: &str) -> OutputPaths {
        let paths = OutputPaths::under(&scratch_root(name));
        paths.ensure().unwrap();
        paths
    }

    #[test]
    fn file_layer_appends_events() {
        let paths = scratch_paths("append");
        let log_file = paths.log_file_path();
        std::fs::write(&log_file, "earlier run\n").unwrap();

        let subscriber = subscriber("info", &log_file).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("failed to load configuration");
        });

        let content = std::fs::read_to_string(&log_file).unwrap();
        assert!(content.starts_with("earlier run\n"));
        assert!(content.contains("ERROR"));
        assert!(content.contains("failed to load configuration"));
    }

    #[test]
    fn missing_log_directory_is_an_error() {
        let result = subscriber("info", Path::new("/nonexistent-rathunter-dir/logs/rat.log"));
        assert!(result.is_err());
    }

    #[test]
    fn startup_failure_lands_in_default_log_file() {
        let root = scratch_root("startup");
        let err = anyhow::anyhow!("invalid RAT_HUNTER_SSL_VERIFY: expected true or false");

        // Only test in this binary that installs the global subscriber.
        report_startup_failure(&root, &err);

        let paths = OutputPaths::under(&root);
        let content = std::fs::read_to_string(paths.log_file_path()).unwrap();
        assert!(content.contains("failed to load configuration"));
        assert!(content.contains("RAT_HUNTER_SSL_VERIFY"));
    }
}
