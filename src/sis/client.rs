use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use crate::config::ApiConfig;
use crate::credentials::AuthError;

const SUBSCRIPTION_HEADER: &str = "Bb-Api-Subscription-Key";

/// Authenticated client for the school SIS API.
#[derive(Clone)]
pub struct SisClient {
    http: reqwest::Client,
    base_url: String,
    subscription_key: String,
    access_token: String,
}

/// Join an endpoint onto the API base. Absolute URLs (pagination links) pass through.
pub fn resolve_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

impl SisClient {
    /// Create a client from API settings and an OAuth access token
    pub fn new(api: &ApiConfig, access_token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("course-rigor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: api.base_url.clone(),
            subscription_key: api.subscription_key.clone(),
            access_token: access_token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header(SUBSCRIPTION_HEADER, &self.subscription_key)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected(format!(
                "{} returned 401 (token invalid or expired, or missing API scopes): {}",
                url, body
            ))
            .into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("SIS API error {} for {}: {}", status, url, body));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// GET an endpoint and decode its JSON body.
    ///
    /// Retries transient failures with exponential backoff (3 attempts);
    /// authentication failures are returned immediately.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = resolve_url(&self.base_url, endpoint);
        tracing::debug!(%url, ?params, "SIS request");

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        RetryIf::start(
            retry_strategy,
            || self.get_once::<T>(&url, params),
            is_retryable,
        )
        .await
    }
}

/// Authentication failures are final; anything else may be transient.
fn is_retryable(error: &anyhow::Error) -> bool {
    error.downcast_ref::<AuthError>().is_none()
}
