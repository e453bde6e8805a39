use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::classify::ClassificationConfig;
use crate::scoring::ScoringConfig;

pub const DEFAULT_BASE_URL: &str = "https://api.sky.blackbaud.com/school";
pub const DEFAULT_AUTH_URL: &str = "https://oauth2.sky.blackbaud.com/authorization";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.sky.blackbaud.com/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Classification tables, falling back to the built-in defaults
    pub fn classification(&self) -> ClassificationConfig {
        self.classification.clone().unwrap_or_default()
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}

/// SKY API application settings. The client secret never lives here.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    pub client_id: String,
    pub subscription_key: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            subscription_key: String::new(),
            redirect_uri: default_redirect_uri(),
            base_url: default_base_url(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
        }
    }
}

/// Which students and school years to pull.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
    pub grad_year_start: u32,
    pub grad_year_end: u32,
    /// SIS role id for students; omitted from the query when unset
    pub role_id: Option<String>,
    /// Newest first; earlier entries win when a title repeats
    pub school_years: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            grad_year_start: 2025,
            grad_year_end: 2026,
            role_id: None,
            school_years: vec![
                "2025-2026".to_string(),
                "2024-2025".to_string(),
                "2023-2024".to_string(),
                "2022-2023".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory the CSV workbook is written to
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("course-report"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// How long a fetched snapshot is reused, e.g. "12h" or "2days"
    pub max_age: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age: "1day".to_string(),
        }
    }
}

impl CacheConfig {
    pub fn max_age(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.max_age)
    }
}
