use std::path::{Path, PathBuf};

use chrono::FixedOffset;

/// What augmentation does with a row that is missing a required field or
/// carries an unparseable timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    /// Fail the whole batch on the first bad row.
    #[default]
    Abort,
    /// Drop the bad row, log it, and keep going.
    Skip,
}

impl std::fmt::Display for MalformedRowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedRowPolicy::Abort => write!(f, "abort"),
            MalformedRowPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source_url: String,
    pub ssl_verify: bool,
    pub root_dir: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub malformed_rows: MalformedRowPolicy,
    /// Overrides the host's local UTC offset when set.
    pub utc_offset: Option<FixedOffset>,
    /// Display name for the local timezone; derived from the offset when unset.
    pub timezone_name: Option<String>,
    pub searches_path: PathBuf,
}

impl AppConfig {
    #[must_use]
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::under(&self.root_dir)
    }
}

/// Standard output locations, all relative to the configured root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub log_dir: PathBuf,
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
}

impl OutputPaths {
    pub const SNAPSHOT_FILE: &'static str = "rat_data.json";
    pub const LOG_FILE: &'static str = "rat_hunter.log";

    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            log_dir: root.join("logs"),
            data_dir: root.join("outputs").join("data"),
            results_dir: root.join("results"),
        }
    }

    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(Self::SNAPSHOT_FILE)
    }

    #[must_use]
    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(Self::LOG_FILE)
    }

    #[must_use]
    pub fn result_path(&self, file_name: &str) -> PathBuf {
        self.results_dir.join(file_name)
    }

    /// Creates every standard directory, including parents.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if a directory cannot be created.
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.log_dir, &self.data_dir, &self.results_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// SMTP credentials and relay host for the notification path.
#[derive(Clone)]
pub struct MailConfig {
    pub account: String,
    pub secret: String,
    pub smtp_host: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("account", &self.account)
            .field("secret", &"[redacted]")
            .field("smtp_host", &self.smtp_host)
            .finish()
    }
}
