use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::filter::{postcode_pattern, DEFAULT_MAX_AGE_MINUTES};
use crate::ConfigError;

/// A saved search: what to match, how fresh it must be, and who hears about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub name: String,
    #[serde(default)]
    pub postcodes: Vec<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default = "default_max_age_minutes")]
    pub max_age_minutes: i64,
    /// Send a "no results" email when nothing matches.
    #[serde(default)]
    pub empty_notification: bool,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
}

impl SearchConfig {
    /// Generate a file-name-safe slug from the search name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .split('_')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The address regex this search filters by.
    #[must_use]
    pub fn address_pattern(&self) -> String {
        match &self.pattern {
            Some(pattern) => pattern.clone(),
            None => postcode_pattern(&self.postcodes),
        }
    }

    /// CSV file name written for this search under the results directory.
    #[must_use]
    pub fn results_file_name(&self) -> String {
        format!("{}_rat_results.csv", self.slug())
    }
}

fn default_in_stock() -> bool {
    true
}

fn default_max_age_minutes() -> i64 {
    DEFAULT_MAX_AGE_MINUTES
}

#[derive(Debug, Deserialize)]
pub struct SearchesFile {
    pub searches: Vec<SearchConfig>,
}

impl SearchesFile {
    #[must_use]
    pub fn find(&self, name_or_slug: &str) -> Option<&SearchConfig> {
        let wanted = name_or_slug.to_lowercase();
        self.searches
            .iter()
            .find(|s| s.name.to_lowercase() == wanted || s.slug() == wanted)
    }
}

/// Load and validate saved searches from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_searches(path: &Path) -> Result<SearchesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SearchesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_searches(&content)
}

pub(crate) fn parse_searches(content: &str) -> Result<SearchesFile, ConfigError> {
    let searches_file: SearchesFile =
        serde_yaml::from_str(content).map_err(ConfigError::SearchesFileParse)?;

    validate_searches(&searches_file)?;

    Ok(searches_file)
}

fn validate_searches(searches_file: &SearchesFile) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for search in &searches_file.searches {
        let slug = search.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(
                "search name must contain at least one letter or digit".to_string(),
            ));
        }

        match (&search.pattern, search.postcodes.is_empty()) {
            (Some(_), false) => {
                return Err(ConfigError::Validation(format!(
                    "search '{}' sets both pattern and postcodes; choose one",
                    search.name
                )));
            }
            (None, true) => {
                return Err(ConfigError::Validation(format!(
                    "search '{}' needs either a pattern or a list of postcodes",
                    search.name
                )));
            }
            (Some(pattern), true) if pattern.trim().is_empty() => {
                return Err(ConfigError::Validation(format!(
                    "search '{}' has an empty pattern",
                    search.name
                )));
            }
            _ => {}
        }

        if search.postcodes.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "search '{}' has a blank postcode",
                search.name
            )));
        }

        if search.max_age_minutes < 0 {
            return Err(ConfigError::Validation(format!(
                "search '{}' has negative max_age_minutes {}",
                search.name, search.max_age_minutes
            )));
        }

        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate search slug: '{}' (from search '{}')",
                slug, search.name
            )));
        }
    }

    Ok(())
}
