use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use super::{get_secret, get_secret_from_env, store_secret, AuthError};

/// Prompts for the OAuth application's client secret (hidden input)
pub fn prompt_for_secret() -> Result<String> {
    println!("SKY API client secret required.");
    println!("Find it under your application in the Blackbaud developer portal.");
    println!();

    let secret = rpassword::prompt_password("Enter client secret: ")
        .context("Failed to read client secret from stdin")?;

    let secret = secret.trim();
    if secret.is_empty() {
        anyhow::bail!("Client secret cannot be empty");
    }

    Ok(secret.to_string())
}

/// Client secret from the environment, then the keyring, prompting and storing
/// it on first use.
pub async fn setup_secret_if_missing() -> Result<String> {
    if let Some(secret) = get_secret_from_env() {
        return Ok(secret);
    }

    match get_secret().await {
        Ok(secret) => Ok(secret),
        Err(AuthError::SecretNotFound) => {
            let secret = prompt_for_secret()?;
            store_secret(secret.clone())
                .await
                .context("Failed to store client secret in keyring")?;
            println!("Client secret stored securely in system keyring.");
            Ok(secret)
        }
        Err(AuthError::KeyringUnavailable(msg)) => {
            anyhow::bail!(
                "System keyring unavailable. Set {} or provide a keyring \
                (macOS Keychain, Windows Credential Store, or Linux Secret Service).\n\
                Error: {}",
                super::ENV_SECRET_VAR,
                msg
            );
        }
        Err(e) => anyhow::bail!("Failed to access keyring: {}", e),
    }
}

/// Pull the `code` out of whatever the user pasted: a bare code or the full
/// redirect URL.
pub fn extract_code(input: &str, expected_state: &str) -> Result<String, AuthError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AuthError::Flow("no authorization code entered".to_string()));
    }

    if !input.contains("code=") {
        return Ok(input.to_string());
    }

    let url = reqwest::Url::parse(input)
        .map_err(|e| AuthError::Flow(format!("could not parse redirect URL: {}", e)))?;
    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(state) = state {
        if state != expected_state {
            return Err(AuthError::Flow("state mismatch in redirect URL".to_string()));
        }
    }
    code.filter(|c| !c.is_empty())
        .ok_or_else(|| AuthError::Flow("redirect URL has no code".to_string()))
}

/// Ask the user to paste the authorization code after signing in.
pub fn prompt_for_code(expected_state: &str) -> Result<String> {
    print!("Paste the authorization code (or the full redirect URL): ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read authorization code")?;

    Ok(extract_code(&line, expected_state)?)
}
