use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

use super::AuthError;
use crate::config::ApiConfig;

pub const CHALLENGE_METHOD: &str = "S256";

/// PKCE verifier/challenge pair plus the CSRF `state` for one login attempt.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub verifier: String,
    pub challenge: String,
    pub state: String,
}

fn random_token(len: usize) -> Result<String, AuthError> {
    let mut bytes = vec![0u8; len];
    getrandom::fill(&mut bytes)
        .map_err(|e| AuthError::Flow(format!("failed to generate random bytes: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// base64url(SHA-256(verifier)), unpadded
pub fn challenge_for(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

impl PkceChallenge {
    pub fn generate() -> Result<Self, AuthError> {
        let verifier = random_token(32)?;
        let challenge = challenge_for(&verifier);
        let state = random_token(16)?;
        Ok(Self {
            verifier,
            challenge,
            state,
        })
    }

    /// Authorization URL the user signs in at.
    pub fn authorization_url(&self, api: &ApiConfig) -> Result<String, AuthError> {
        let url = reqwest::Url::parse_with_params(
            &api.auth_url,
            &[
                ("client_id", api.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", api.redirect_uri.as_str()),
                ("code_challenge", self.challenge.as_str()),
                ("code_challenge_method", CHALLENGE_METHOD),
                ("state", self.state.as_str()),
            ],
        )
        .map_err(|e| AuthError::Flow(format!("invalid authorization URL {}: {e}", api.auth_url)))?;
        Ok(url.to_string())
    }
}
