use std::env::VarError;
use std::path::PathBuf;

use chrono::FixedOffset;

use crate::app_config::{AppConfig, MailConfig, MalformedRowPolicy};
use crate::ConfigError;

pub(crate) const DEFAULT_SOURCE_URL: &str = "https://sparkling-voice-bdd0.pipelabs-au.workers.dev/";
pub(crate) const DEFAULT_USER_AGENT: &str = "rathunter/0.1 (stock-alerts)";
pub(crate) const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

pub const MAIL_ACCOUNT_VAR: &str = "GMAIL_ACC";
pub const MAIL_SECRET_VAR: &str = "GMAIL_PWORD";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load the SMTP credential pair and relay host.
///
/// Only the notification path calls this, so a run that never sends email
/// does not need the credentials.
///
/// # Errors
///
/// Returns [`ConfigError::MissingEnvVar`] naming the first absent credential.
pub fn load_mail_config() -> Result<MailConfig, ConfigError> {
    build_mail_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let source_url = or_default("RAT_HUNTER_SOURCE_URL", DEFAULT_SOURCE_URL);
    if source_url.trim().is_empty() {
        return Err(invalid("RAT_HUNTER_SOURCE_URL", "must be non-empty".to_string()));
    }

    let ssl_verify = parse_bool(&or_default("RAT_HUNTER_SSL_VERIFY", "true"))
        .ok_or_else(|| invalid("RAT_HUNTER_SSL_VERIFY", "expected true or false".to_string()))?;

    let root_dir = PathBuf::from(or_default("RAT_HUNTER_ROOT", "."));
    let log_level = or_default("RAT_HUNTER_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("RAT_HUNTER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RAT_HUNTER_USER_AGENT", DEFAULT_USER_AGENT);

    let malformed_rows = parse_row_policy(&or_default("RAT_HUNTER_MALFORMED_ROWS", "abort"))?;

    let utc_offset = match lookup("RAT_HUNTER_UTC_OFFSET") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<FixedOffset>()
                .map_err(|e| invalid("RAT_HUNTER_UTC_OFFSET", e.to_string()))?,
        ),
        Err(_) => None,
    };
    let timezone_name = lookup("RAT_HUNTER_TZ_NAME")
        .ok()
        .filter(|name| !name.trim().is_empty());

    let searches_path = PathBuf::from(or_default(
        "RAT_HUNTER_SEARCHES_PATH",
        "./config/searches.yaml",
    ));

    Ok(AppConfig {
        source_url,
        ssl_verify,
        root_dir,
        log_level,
        request_timeout_secs,
        user_agent,
        malformed_rows,
        utc_offset,
        timezone_name,
        searches_path,
    })
}

fn build_mail_config<F>(lookup: F) -> Result<MailConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let account = require(MAIL_ACCOUNT_VAR)?;
    let secret = require(MAIL_SECRET_VAR)?;
    let smtp_host =
        lookup("RAT_HUNTER_SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());

    Ok(MailConfig {
        account,
        secret,
        smtp_host,
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_row_policy(raw: &str) -> Result<MalformedRowPolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "abort" => Ok(MalformedRowPolicy::Abort),
        "skip" => Ok(MalformedRowPolicy::Skip),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RAT_HUNTER_MALFORMED_ROWS".to_string(),
            reason: format!("unknown policy '{other}'; expected abort or skip"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
