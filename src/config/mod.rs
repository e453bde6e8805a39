pub mod init;
mod schema;

pub use schema::{
    ApiConfig, CacheConfig, Config, OutputConfig, RosterConfig, DEFAULT_AUTH_URL,
    DEFAULT_BASE_URL, DEFAULT_REDIRECT_URI, DEFAULT_TOKEN_URL,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::classify::validate_classification;
use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/course-rigor/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from(std::env::var("HOME").unwrap_or_default()))
        .join(".config")
        .join("course-rigor")
}

/// Get the default config file path (~/.config/course-rigor/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/course-rigor/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `course-rigor init` to create one",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Validate the whole config, collecting every problem rather than stopping at
/// the first one.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.api.client_id.trim().is_empty() {
        errors.push("api.client_id: must not be empty".to_string());
    }
    if config.api.subscription_key.trim().is_empty() {
        errors.push("api.subscription_key: must not be empty".to_string());
    }

    let roster = &config.roster;
    if roster.grad_year_start > roster.grad_year_end {
        errors.push(format!(
            "roster: grad_year_start ({}) is after grad_year_end ({})",
            roster.grad_year_start, roster.grad_year_end
        ));
    }
    if roster.school_years.is_empty() {
        errors.push("roster.school_years: at least one school year is required".to_string());
    }
    for year in &roster.school_years {
        if !is_school_year(year) {
            errors.push(format!(
                "roster.school_years: '{}' is not of the form YYYY-YYYY",
                year
            ));
        }
    }

    if let Err(e) = config.cache.max_age() {
        errors.push(format!("cache.max_age: '{}': {}", config.cache.max_age, e));
    }

    if let Some(classification) = &config.classification {
        if let Err(errs) = validate_classification(classification) {
            errors.extend(errs.into_iter().map(|e| format!("classification: {}", e)));
        }
    }
    if let Some(scoring) = &config.scoring {
        if let Err(errs) = validate_scoring(scoring) {
            errors.extend(errs.into_iter().map(|e| format!("scoring: {}", e)));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// "2025-2026": two four-digit years, the second one after the first
fn is_school_year(value: &str) -> bool {
    let Some((start, end)) = value.split_once('-') else {
        return false;
    };
    match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(s), Ok(e)) => start.len() == 4 && end.len() == 4 && e == s + 1,
        _ => false,
    }
}
