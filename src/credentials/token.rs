use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const TOKEN_CACHE_KEY: &str = "oauth:sky-token";

/// Seconds before expiry at which a token stops being reused
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Build a cache entry from a token response. Refresh responses may omit the
    /// refresh token, in which case the previous one is kept.
    pub fn from_response(
        response: TokenResponse,
        previous_refresh: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        // SKY access tokens last an hour
        let lifetime = response.expires_in.unwrap_or(3600);
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: now + Duration::seconds(lifetime),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Token cache location (~/.cache/course-rigor/auth)
pub fn get_token_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("course-rigor/auth"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/course-rigor/auth",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

pub fn read_cached_token(cache_path: &Path) -> Option<CachedToken> {
    let bytes = cacache::read_sync(cache_path, TOKEN_CACHE_KEY).ok()?;
    serde_json::from_slice(&bytes).ok()
}

pub fn write_cached_token(cache_path: &Path, token: &CachedToken) -> Result<()> {
    let json = serde_json::to_vec(token)?;
    cacache::write_sync(cache_path, TOKEN_CACHE_KEY, &json).context("Failed to cache access token")?;
    Ok(())
}

/// Remove the cached token. Missing cache is not an error.
pub fn clear_cached_token() -> Result<()> {
    let cache_path = get_token_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove token cache"),
    }
}
