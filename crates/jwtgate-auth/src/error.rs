//! Token errors

use thiserror::Error;

/// Everything that can go wrong while issuing or reading a token.
///
/// The provider always surfaces these to its caller; the request
/// interceptors swallow them and continue unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong segment count, undecodable base64, unparsable JSON, or missing
    /// timing claims.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Signature mismatch, or a header algorithm other than HS256.
    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    /// A claim required to rebuild the identity is absent.
    #[error("Malformed claims: missing '{0}'")]
    MalformedClaims(String),

    /// An authority that cannot be represented in the comma-joined claim.
    #[error("Invalid authority '{0}': authorities must be non-empty and must not contain ','")]
    InvalidAuthority(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken => {
                TokenError::MalformedToken("expected three '.'-separated segments".to_string())
            }
            _ => TokenError::MalformedToken(err.to_string()),
        }
    }
}
