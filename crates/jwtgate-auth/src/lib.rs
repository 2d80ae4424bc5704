//! Stateless bearer token issuing and validation
//!
//! Tokens are HS256-signed JWTs carrying an [`Identity`] (subject id plus a
//! set of authorities). The [`TokenProvider`] owns the secret key and the two
//! expiry durations and is shared read-only across all requests.

pub mod claims;
pub mod config;
pub mod error;
pub mod identity;
pub mod jwt;
pub mod key;
pub mod provider;
pub mod token;

pub use claims::Claims;
pub use config::{minutes_to_millis, ConfigError, JwtConfig};
pub use error::TokenError;
pub use identity::Identity;
pub use key::{KeyError, SecretKey};
pub use provider::{TokenAuthenticator, TokenProvider};
pub use token::{Token, TokenPair};
