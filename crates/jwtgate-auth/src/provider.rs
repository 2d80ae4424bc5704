//! Token provider: issues and reads identity tokens with one fixed key
//!
//! The provider is immutable after construction and safe to share across
//! threads behind an `Arc`. Every error from the codecs is surfaced to the
//! caller unchanged; deciding what to do about a bad token is the caller's
//! business.

use std::collections::BTreeMap;

use chrono::Duration;
use jsonwebtoken::Header;
use tracing::debug;

use crate::{claims, jwt, Claims, ConfigError, Identity, SecretKey, Token, TokenError, TokenPair};

/// Resolves a bearer token to an identity
///
/// This is the seam the request interceptors depend on. [`TokenProvider`]
/// is the production implementation.
pub trait TokenAuthenticator: Send + Sync {
    fn get_authentication(&self, token: &str) -> Result<Identity, TokenError>;
}

/// Issues access/refresh tokens and recovers identities from them
#[derive(Debug, Clone)]
pub struct TokenProvider {
    secret_key: SecretKey,
    access_token_expire: Duration,
    refresh_token_expire: Duration,
}

impl TokenProvider {
    /// Create a provider
    ///
    /// Both expiries must be positive.
    pub fn new(
        secret_key: SecretKey,
        access_token_expire: Duration,
        refresh_token_expire: Duration,
    ) -> Result<Self, ConfigError> {
        if access_token_expire <= Duration::zero() {
            return Err(ConfigError::NonPositiveExpire("access_token_expire"));
        }
        if refresh_token_expire <= Duration::zero() {
            return Err(ConfigError::NonPositiveExpire("refresh_token_expire"));
        }

        Ok(Self {
            secret_key,
            access_token_expire,
            refresh_token_expire,
        })
    }

    pub fn access_token_expire(&self) -> Duration {
        self.access_token_expire
    }

    pub fn refresh_token_expire(&self) -> Duration {
        self.refresh_token_expire
    }

    pub fn create_access_token(&self, identity: &Identity) -> Result<Token, TokenError> {
        self.create_token(claims::encode(identity)?, self.access_token_expire)
    }

    pub fn create_refresh_token(&self, identity: &Identity) -> Result<Token, TokenError> {
        self.create_token(claims::encode(identity)?, self.refresh_token_expire)
    }

    /// Sign arbitrary claims with this provider's key
    pub fn create_token(&self, claims: Claims, expire: Duration) -> Result<Token, TokenError> {
        jwt::sign(claims, expire, &self.secret_key)
    }

    /// Sign arbitrary claims with extra header fields such as `kid`
    ///
    /// The header's `alg` is overridden with HS256.
    pub fn create_token_with_header(
        &self,
        header: Header,
        claims: Claims,
        expire: Duration,
    ) -> Result<Token, TokenError> {
        jwt::sign_with_header(header, claims, expire, &self.secret_key)
    }

    /// Verify `token` and rebuild the identity it carries
    pub fn get_authentication(&self, token: &str) -> Result<Identity, TokenError> {
        claims::decode(&self.claims(token)?)
    }

    /// Verified claims of `token`, including `iat` and `exp`
    pub fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        jwt::verify_and_parse(token, &self.secret_key)
    }

    /// Verified header of `token`
    pub fn header(&self, token: &str) -> Result<BTreeMap<String, String>, TokenError> {
        jwt::header(token, &self.secret_key)
    }

    /// Exchange a refresh token for a fresh access/refresh pair
    ///
    /// The presented token stays valid until its own expiry; there is no
    /// revocation state.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let identity = self.get_authentication(refresh_token)?;
        debug!("Refreshing tokens for subject '{}'", identity.id);

        Ok(TokenPair {
            access_token: self.create_access_token(&identity)?,
            refresh_token: self.create_refresh_token(&identity)?,
        })
    }
}

impl TokenAuthenticator for TokenProvider {
    fn get_authentication(&self, token: &str) -> Result<Identity, TokenError> {
        TokenProvider::get_authentication(self, token)
    }
}
