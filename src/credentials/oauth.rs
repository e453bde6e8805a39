use anyhow::{Context, Result};
use chrono::Utc;

use super::pkce::PkceChallenge;
use super::prompt::{prompt_for_code, setup_secret_if_missing};
use super::token::{get_token_cache_path, read_cached_token, write_cached_token, CachedToken, TokenResponse};
use super::AuthError;
use crate::config::ApiConfig;

async fn request_token(
    api: &ApiConfig,
    client_secret: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let http = reqwest::Client::new();
    let response = http
        .post(&api.token_url)
        .basic_auth(&api.client_id, Some(client_secret))
        .form(form)
        .send()
        .await
        .with_context(|| format!("Token request to {} failed", api.token_url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Rejected(format!("token endpoint returned {}: {}", status, body)).into());
    }

    response
        .json::<TokenResponse>()
        .await
        .context("Failed to parse token response")
}

/// Exchange an authorization code (plus PKCE verifier) for tokens.
pub async fn exchange_code(
    api: &ApiConfig,
    client_secret: &str,
    code: &str,
    verifier: &str,
) -> Result<TokenResponse> {
    request_token(
        api,
        client_secret,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", api.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ],
    )
    .await
}

pub async fn refresh_token(api: &ApiConfig, client_secret: &str, refresh: &str) -> Result<TokenResponse> {
    request_token(
        api,
        client_secret,
        &[("grant_type", "refresh_token"), ("refresh_token", refresh)],
    )
    .await
}

/// Browser sign-in: open the authorization page, read back the pasted code.
async fn interactive_login(api: &ApiConfig, client_secret: &str) -> Result<TokenResponse> {
    let pkce = PkceChallenge::generate()?;
    let url = pkce.authorization_url(api)?;

    eprintln!("Opening browser to sign in to Blackbaud SKY...");
    if let Err(e) = crate::browser::open_url(&url) {
        tracing::warn!("{:#}", e);
    }
    eprintln!("If the browser did not open, visit:\n  {}", url);
    eprintln!();

    let code = prompt_for_code(&pkce.state)?;
    exchange_code(api, client_secret, &code, &pkce.verifier).await
}

/// A usable access token: cached if still fresh, refreshed if possible,
/// otherwise obtained through the browser flow. New tokens are cached.
pub async fn obtain_access_token(api: &ApiConfig) -> Result<String> {
    let cache_path = get_token_cache_path();
    let cached = read_cached_token(&cache_path);

    if let Some(token) = &cached {
        if token.is_fresh(Utc::now()) {
            tracing::debug!(expires_at = %token.expires_at, "Using cached access token");
            return Ok(token.access_token.clone());
        }
    }

    let client_secret = setup_secret_if_missing().await?;
    let previous_refresh = cached.and_then(|t| t.refresh_token);

    let response = match &previous_refresh {
        Some(refresh) => match refresh_token(api, &client_secret, refresh).await {
            Ok(response) => {
                tracing::debug!("Refreshed access token");
                response
            }
            Err(e) => {
                tracing::warn!("Token refresh failed, signing in again: {:#}", e);
                interactive_login(api, &client_secret).await?
            }
        },
        None => interactive_login(api, &client_secret).await?,
    };

    let token = CachedToken::from_response(response, previous_refresh, Utc::now());
    if let Err(e) = write_cached_token(&cache_path, &token) {
        tracing::warn!("{:#}", e);
    }
    Ok(token.access_token)
}
