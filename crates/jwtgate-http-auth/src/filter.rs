//! Blocking, once-per-request interceptor

use std::sync::Arc;

use http::header::AUTHORIZATION;
use jwtgate_auth::{Identity, TokenAuthenticator, TokenProvider};

use crate::bearer::resolve_identity;

/// A request the interceptors can read a header from and bind an identity to
pub trait AuthRequest {
    /// Value of the first header called `name` (case-insensitive)
    fn header(&self, name: &str) -> Option<&str>;

    /// Attach the authenticated identity for the rest of this request
    fn bind_identity(&mut self, identity: Identity);
}

impl<B> AuthRequest for http::Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn bind_identity(&mut self, identity: Identity) {
        self.extensions_mut().insert(identity);
    }
}

/// Blocking bearer token filter
///
/// Holds no per-request state; one instance serves every request.
pub struct JwtFilter<A: ?Sized = TokenProvider> {
    authenticator: Arc<A>,
}

impl<A: ?Sized> Clone for JwtFilter<A> {
    fn clone(&self) -> Self {
        Self {
            authenticator: self.authenticator.clone(),
        }
    }
}

impl<A: TokenAuthenticator + ?Sized> JwtFilter<A> {
    pub fn new(authenticator: Arc<A>) -> Self {
        Self { authenticator }
    }

    /// Bind the request's identity if it carries a valid bearer token.
    ///
    /// Returns whether an identity was bound. Never fails.
    pub fn authenticate<R: AuthRequest + ?Sized>(&self, request: &mut R) -> bool {
        let identity = resolve_identity(
            self.authenticator.as_ref(),
            request.header(AUTHORIZATION.as_str()),
        );

        match identity {
            Some(identity) => {
                request.bind_identity(identity);
                true
            }
            None => false,
        }
    }

    /// Authenticate `request`, then hand it to `chain`.
    ///
    /// `chain` runs exactly once whether or not authentication succeeded.
    pub fn do_filter<R, F, T>(&self, request: &mut R, chain: F) -> T
    where
        R: AuthRequest + ?Sized,
        F: FnOnce(&mut R) -> T,
    {
        self.authenticate(request);
        chain(request)
    }
}
