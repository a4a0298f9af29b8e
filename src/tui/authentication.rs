use anyhow::{Context, bail};
use planify::storage::config::Config;
use planify::sync::auth::{AuthContext, TOKEN_ENV, TokenInfo, TokenStorage};

/// Resolves a usable session, asking for a token on stdin when neither the
/// environment nor the cache holds a valid one.
pub fn check_or_setup_auth(config: &Config) -> anyhow::Result<AuthContext> {
    let storage = TokenStorage::new(config.api.token_cache.clone());
    let auth = AuthContext::from_env_or_storage(&storage);

    if auth.is_authenticated() {
        return Ok(auth);
    }

    println!("No valid Planify session found.");
    println!("Log in at {} and paste your access token below.", config.api.base_url);
    println!("(You can also set {} to skip this prompt.)\n", TOKEN_ENV);
    println!("Access token: ");

    let mut raw = String::new();
    std::io::stdin()
        .read_line(&mut raw)
        .context("Failed to read access token")?;
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("No access token entered");
    }

    let token = TokenInfo::new(raw.to_string());
    if !token.is_valid() {
        bail!("That token has already expired");
    }

    if let Err(e) = storage.save_token(&token) {
        tracing::warn!("Could not cache session token: {}", e);
    }
    println!("\nSession saved to {}.\n", config.api.token_cache.display());

    Ok(AuthContext::new(token))
}
