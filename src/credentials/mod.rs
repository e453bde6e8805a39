pub mod oauth;
pub mod pkce;
pub mod prompt;
pub mod token;

use keyring::Entry;
use std::fmt;

const SERVICE_NAME: &str = "course-rigor";
const SECRET_KEY: &str = "sky-client-secret";

/// Environment variable providing the OAuth client secret without keyring
pub const ENV_SECRET_VAR: &str = "COURSE_RIGOR_CLIENT_SECRET";

pub use oauth::obtain_access_token;
pub use prompt::{prompt_for_secret, setup_secret_if_missing};
pub use token::clear_cached_token;

/// Client secret from COURSE_RIGOR_CLIENT_SECRET, if set and non-empty.
pub fn get_secret_from_env() -> Option<String> {
    non_empty(std::env::var(ENV_SECRET_VAR).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug)]
pub enum AuthError {
    KeyringUnavailable(String),
    SecretNotFound,
    StoreFailed(String),
    /// The SIS or the token endpoint refused our credentials
    Rejected(String),
    /// Authorization flow did not produce a usable token
    Flow(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::KeyringUnavailable(msg) => write!(f, "Keyring unavailable: {}", msg),
            AuthError::SecretNotFound => write!(f, "Client secret not found in keyring"),
            AuthError::StoreFailed(msg) => write!(f, "Failed to store client secret: {}", msg),
            AuthError::Rejected(msg) => write!(f, "Authentication rejected: {}", msg),
            AuthError::Flow(msg) => write!(f, "Authorization failed: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

fn get_secret_sync() -> Result<String, AuthError> {
    let entry = Entry::new(SERVICE_NAME, SECRET_KEY)
        .map_err(|e| AuthError::KeyringUnavailable(format!("{}", e)))?;

    entry.get_password().map_err(|e| match e {
        keyring::Error::NoEntry => AuthError::SecretNotFound,
        _ => AuthError::KeyringUnavailable(format!("{}", e)),
    })
}

fn store_secret_sync(secret: &str) -> Result<(), AuthError> {
    let entry = Entry::new(SERVICE_NAME, SECRET_KEY)
        .map_err(|e| AuthError::KeyringUnavailable(format!("{}", e)))?;

    entry
        .set_password(secret)
        .map_err(|e| AuthError::StoreFailed(format!("{}", e)))
}

/// Read the client secret from the system keyring without blocking the runtime
pub async fn get_secret() -> Result<String, AuthError> {
    tokio::task::spawn_blocking(get_secret_sync)
        .await
        .map_err(|e| AuthError::KeyringUnavailable(format!("Task join error: {}", e)))?
}

/// Store the client secret in the system keyring without blocking the runtime
pub async fn store_secret(secret: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || store_secret_sync(&secret))
        .await
        .map_err(|e| AuthError::KeyringUnavailable(format!("Task join error: {}", e)))?
}
