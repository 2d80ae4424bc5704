//! HMAC signing key

use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::fmt;
use thiserror::Error;

/// Minimum key length for HS256 (256 bits)
pub const MIN_KEY_LEN: usize = 32;

/// Key errors
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Secret key is not valid base64: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Secret key is too short: {0} bytes, need at least 32")]
    TooShort(usize),
}

/// Symmetric key material for signing and verifying tokens
///
/// Held for the lifetime of the provider. The raw bytes are never exposed,
/// serialized, or printed.
#[derive(Clone)]
pub struct SecretKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SecretKey {
    pub fn from_bytes(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.len() < MIN_KEY_LEN {
            return Err(KeyError::TooShort(secret.len()));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    /// Decode a base64 (standard alphabet) secret
    pub fn from_base64(secret: &str) -> Result<Self, KeyError> {
        let bytes = STANDARD.decode(secret.trim())?;
        Self::from_bytes(&bytes)
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base64() {
        let encoded = STANDARD.encode([7u8; 48]);
        assert!(SecretKey::from_base64(&encoded).is_ok());
    }

    #[test]
    fn test_short_key_rejected() {
        let encoded = STANDARD.encode([7u8; 16]);
        assert!(matches!(
            SecretKey::from_base64(&encoded),
            Err(KeyError::TooShort(16))
        ));
        assert!(matches!(
            SecretKey::from_bytes(b""),
            Err(KeyError::TooShort(0))
        ));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(matches!(
            SecretKey::from_base64("not base64 at all!"),
            Err(KeyError::Base64Error(_))
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = SecretKey::from_bytes(b"0123456789abcdef0123456789abcdef").unwrap();
        let printed = format!("{:?}", key);
        assert_eq!(printed, "SecretKey(<redacted>)");
        assert!(!printed.contains("0123"));
    }
}
