//! JWT (JSON Web Token) signing and verification
//!
//! The compact form is `base64url(header).base64url(claims).base64url(signature)`
//! with the header pinned to HS256. Timing claims are written as NumericDate
//! seconds; expiry arithmetic itself is done in integer milliseconds.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use serde_json::{Map, Value};

use crate::claims::{EXPIRES_AT, ISSUED_AT};
use crate::{Claims, SecretKey, Token, TokenError};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Validation pinned to HS256
///
/// Validates ONLY the signature. Expiry is checked afterwards with
/// millisecond precision so it can be reported as [`TokenError::Expired`].
fn validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Sign `claims` with an expiry of `expire` from now.
pub fn sign(claims: Claims, expire: Duration, key: &SecretKey) -> Result<Token, TokenError> {
    sign_at(claims, expire, key, now_millis())
}

/// Sign `claims` as if the current time were `now_ms` (Unix milliseconds).
///
/// Any `iat`/`exp` already present in `claims` is overwritten.
pub fn sign_at(
    claims: Claims,
    expire: Duration,
    key: &SecretKey,
    now_ms: i64,
) -> Result<Token, TokenError> {
    sign_with_header_at(Header::new(ALGORITHM), claims, expire, key, now_ms)
}

/// Sign with caller-supplied header fields (`kid`, `cty`, ...).
///
/// `alg` is always forced to HS256.
pub fn sign_with_header(
    header: Header,
    claims: Claims,
    expire: Duration,
    key: &SecretKey,
) -> Result<Token, TokenError> {
    sign_with_header_at(header, claims, expire, key, now_millis())
}

pub fn sign_with_header_at(
    mut header: Header,
    claims: Claims,
    expire: Duration,
    key: &SecretKey,
    now_ms: i64,
) -> Result<Token, TokenError> {
    header.alg = ALGORITHM;

    let issued_at = now_ms;
    let expires_at = now_ms.saturating_add(expire.num_milliseconds());

    let mut payload: Map<String, Value> = claims
        .into_inner()
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    payload.insert(ISSUED_AT.to_string(), Value::from(issued_at.div_euclid(1000)));
    payload.insert(EXPIRES_AT.to_string(), Value::from(expires_at.div_euclid(1000)));

    let token = encode(&header, &payload, key.encoding_key())
        .map_err(|e| TokenError::Signing(e.to_string()))?;

    Ok(Token::new(token))
}

/// Verify the signature and expiry of `token` and return its claims.
pub fn verify_and_parse(token: &str, key: &SecretKey) -> Result<Claims, TokenError> {
    verify_and_parse_at(token, key, now_millis())
}

/// Verify `token` as if the current time were `now_ms` (Unix milliseconds).
///
/// The signature is checked before anything in the payload is trusted.
/// Non-string claim values are returned as their JSON text.
pub fn verify_and_parse_at(
    token: &str,
    key: &SecretKey,
    now_ms: i64,
) -> Result<Claims, TokenError> {
    check_segments(token)?;
    let payload = decode::<Map<String, Value>>(token, key.decoding_key(), &validation())?.claims;

    timing_claim(&payload, ISSUED_AT)?;
    let expires_at = timing_claim(&payload, EXPIRES_AT)?;
    if now_ms > expires_at.saturating_mul(1000) {
        return Err(TokenError::Expired);
    }

    Ok(payload
        .into_iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect())
}

/// Header fields of a fully verified token
pub fn header(token: &str, key: &SecretKey) -> Result<BTreeMap<String, String>, TokenError> {
    verify_and_parse(token, key)?;

    let header = decode_header(token)?;
    let value = serde_json::to_value(&header)
        .map_err(|e| TokenError::MalformedToken(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(TokenError::MalformedToken("header is not an object".to_string()));
    };

    Ok(fields
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((k, s)),
            other => Some((k, other.to_string())),
        })
        .collect())
}

/// Every segment must be present and valid base64url before the signature
/// is compared, so a garbled payload or signature reads as malformed.
fn check_segments(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::MalformedToken(
            "expected three '.'-separated segments".to_string(),
        ));
    }

    for (name, segment) in ["header", "claims", "signature"].iter().zip(segments) {
        URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|e| TokenError::MalformedToken(format!("{} segment: {}", name, e)))?;
    }

    Ok(())
}

fn timing_claim(payload: &Map<String, Value>, key: &str) -> Result<i64, TokenError> {
    payload
        .get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| TokenError::MalformedToken(format!("missing or non-integer '{}' claim", key)))
}
