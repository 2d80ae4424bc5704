//! Flat claim map and the Identity <-> Claims codec

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{Identity, TokenError};

/// Subject identifier claim
pub const ID: &str = "id";
/// Comma-joined authorities claim
pub const AUTHORITIES: &str = "authorities";
/// Issued-at claim (NumericDate seconds), owned by the token codec
pub const ISSUED_AT: &str = "iat";
/// Expiration claim (NumericDate seconds), owned by the token codec
pub const EXPIRES_AT: &str = "exp";

const DELIMITER: char = ',';

/// String-keyed, string-valued token payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims(BTreeMap<String, String>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// `iat` as an instant, if present and numeric
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(ISSUED_AT)
    }

    /// `exp` as an instant, if present and numeric
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp(EXPIRES_AT)
    }

    fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let secs = self.get(key)?.parse::<i64>().ok()?;
        DateTime::<Utc>::from_timestamp(secs, 0)
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for Claims {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for Claims
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Encode an identity as exactly the `id` and `authorities` claims.
///
/// Authorities are joined in sorted order, so the output is deterministic.
/// An authority that is empty or contains the delimiter could not survive a
/// round-trip and is rejected.
pub fn encode(identity: &Identity) -> Result<Claims, TokenError> {
    if let Some(bad) = identity
        .authorities
        .iter()
        .find(|a| a.is_empty() || a.contains(DELIMITER))
    {
        return Err(TokenError::InvalidAuthority(bad.clone()));
    }

    let authorities = identity
        .authorities
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",");

    let mut claims = Claims::new();
    claims.insert(ID, identity.id.clone());
    claims.insert(AUTHORITIES, authorities);
    Ok(claims)
}

/// Rebuild an identity from `id` and `authorities`.
///
/// Extra claims (timing, custom) are ignored.
pub fn decode(claims: &Claims) -> Result<Identity, TokenError> {
    let id = claims
        .get(ID)
        .ok_or_else(|| TokenError::MalformedClaims(ID.to_string()))?;
    let authorities = claims
        .get(AUTHORITIES)
        .ok_or_else(|| TokenError::MalformedClaims(AUTHORITIES.to_string()))?;

    Ok(Identity {
        id: id.to_string(),
        authorities: authorities
            .split(DELIMITER)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
