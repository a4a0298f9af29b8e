use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const TOKEN_ENV: &str = "PLANIFY_TOKEN";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read token file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse token: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("No session token available")]
    MissingToken,
    #[error("Session token has expired")]
    TokenExpired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub token_type: String,
}

impl TokenInfo {
    /// Builds a bearer token, reading its expiry from the JWT `exp` claim when
    /// the token is a JWT.
    pub fn new(access_token: String) -> Self {
        let expires_at = jwt_expiry(&access_token);
        Self {
            access_token,
            expires_at,
            token_type: "Bearer".to_string(),
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.trim().is_empty() && self.expires_at.is_none_or(|at| at > now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    exp: Option<i64>,
}

fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&bytes).ok()?;
    Utc.timestamp_opt(claims.exp?, 0).single()
}

pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn save_token(&self, token: &TokenInfo) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn load_token(&self) -> Result<TokenInfo, AuthError> {
        let content = std::fs::read_to_string(&self.path)?;
        let token: TokenInfo = serde_json::from_str(&content)?;
        Ok(token)
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The session a client acts on behalf of. Every request asks for the bearer
/// token through [`AuthContext::bearer`], so an expired session is reported
/// before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    token: Option<TokenInfo>,
}

impl AuthContext {
    pub fn new(token: TokenInfo) -> Self {
        Self { token: Some(token) }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Environment variable first, then the token cache.
    pub fn from_env_or_storage(storage: &TokenStorage) -> Self {
        if let Ok(raw) = std::env::var(TOKEN_ENV)
            && !raw.trim().is_empty()
        {
            tracing::info!("Using session token from {}", TOKEN_ENV);
            return Self::new(TokenInfo::new(raw.trim().to_string()));
        }

        match storage.load_token() {
            Ok(token) => Self::new(token),
            Err(e) => {
                tracing::info!("No cached session token: {}", e);
                Self::anonymous()
            }
        }
    }

    pub fn bearer(&self) -> Result<&str, AuthError> {
        self.bearer_at(Utc::now())
    }

    pub fn bearer_at(&self, now: DateTime<Utc>) -> Result<&str, AuthError> {
        let token = self.token.as_ref().ok_or(AuthError::MissingToken)?;
        if token.is_valid_at(now) {
            Ok(&token.access_token)
        } else {
            Err(AuthError::TokenExpired)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_ok()
    }
}
