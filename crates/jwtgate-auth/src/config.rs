//! Provider configuration
//!
//! Values arrive already loaded (CLI flags, environment, a config file);
//! this module only turns them into a [`TokenProvider`].

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::{KeyError, SecretKey, TokenProvider};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid secret key: {0}")]
    InvalidKey(#[from] KeyError),

    #[error("{0} must be a positive duration")]
    NonPositiveExpire(&'static str),
}

/// Token settings as supplied by the host application
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    /// Base64-encoded secret (at least 32 bytes once decoded)
    pub secret: String,
    /// Access token validity in minutes
    pub access_token_expire: i64,
    /// Refresh token validity in minutes
    pub refresh_token_expire: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expire", &self.access_token_expire)
            .field("refresh_token_expire", &self.refresh_token_expire)
            .finish()
    }
}

impl JwtConfig {
    pub fn build_provider(&self) -> Result<TokenProvider, ConfigError> {
        let secret_key = SecretKey::from_base64(&self.secret)?;

        TokenProvider::new(
            secret_key,
            expire("access_token_expire", self.access_token_expire)?,
            expire("refresh_token_expire", self.refresh_token_expire)?,
        )
    }
}

fn expire(name: &'static str, minutes: i64) -> Result<Duration, ConfigError> {
    if minutes <= 0 {
        return Err(ConfigError::NonPositiveExpire(name));
    }
    Ok(Duration::milliseconds(minutes_to_millis(minutes)))
}

/// Convert minutes to milliseconds, saturating at the `i64` bounds
pub fn minutes_to_millis(minutes: i64) -> i64 {
    minutes.saturating_mul(60_000)
}
