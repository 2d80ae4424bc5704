//! Bearer credential extraction (RFC 6750)
//!
//! # Format
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! The scheme is matched case-sensitively with exactly one space.

use jwtgate_auth::{Identity, TokenAuthenticator};
use tracing::debug;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Classification of an `Authorization` header value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerHeader<'a> {
    /// No header (or a value that is not visible ASCII)
    Absent,
    /// Some other scheme, e.g. `Basic ...`
    NotBearer,
    /// The token following `Bearer `
    Bearer(&'a str),
}

impl<'a> BearerHeader<'a> {
    pub fn classify(value: Option<&'a str>) -> Self {
        match value {
            None => BearerHeader::Absent,
            Some(value) => match value.strip_prefix(BEARER_PREFIX) {
                Some(token) => BearerHeader::Bearer(token),
                None => BearerHeader::NotBearer,
            },
        }
    }
}

/// Resolve an `Authorization` header value to an identity.
///
/// Returns `None` for every failure; token errors are logged and dropped.
pub(crate) fn resolve_identity<A>(authenticator: &A, header: Option<&str>) -> Option<Identity>
where
    A: TokenAuthenticator + ?Sized,
{
    match BearerHeader::classify(header) {
        BearerHeader::Absent => {
            debug!("Bearer auth: no Authorization header, continuing unauthenticated");
            None
        }
        BearerHeader::NotBearer => {
            debug!("Bearer auth: not a Bearer credential, continuing unauthenticated");
            None
        }
        BearerHeader::Bearer(token) => match authenticator.get_authentication(token) {
            Ok(identity) => {
                debug!("Bearer auth: authenticated subject '{}'", identity.id);
                Some(identity)
            }
            Err(e) => {
                debug!("Bearer auth: {}, continuing unauthenticated", e);
                None
            }
        },
    }
}
