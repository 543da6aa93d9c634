pub mod app_config;
pub mod config;
pub mod filter;
pub mod records;
pub mod run_context;
pub mod searches;
pub mod status;

use thiserror::Error;

pub use app_config::{AppConfig, MailConfig, MalformedRowPolicy, OutputPaths};
pub use config::{load_app_config, load_app_config_from_env, load_mail_config};
pub use filter::{
    filter_aged, filter_by_address, postcode_pattern, FilterError, DEFAULT_MAX_AGE_MINUTES,
};
pub use records::{AugmentedRecord, StockRecord};
pub use run_context::{HostZone, RunContext, RunMetadata, ZoneRules};
pub use searches::{load_searches, SearchConfig, SearchesFile};
pub use status::StockStatus;

/// Errors raised while loading environment or file-based configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read searches file {path}: {source}")]
    SearchesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse searches file: {0}")]
    SearchesFileParse(#[source] serde_yaml::Error),

    #[error("invalid searches configuration: {0}")]
    Validation(String),
}
