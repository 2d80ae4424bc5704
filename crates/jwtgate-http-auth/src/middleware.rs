//! Axum middleware function
//!
//! Same contract as [`JwtLayer`](crate::JwtLayer), for routers that compose
//! middleware with `axum::middleware::from_fn_with_state`. Handlers read the
//! identity with `Extension<Identity>` or from the request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jwtgate_auth::{TokenAuthenticator, TokenProvider};
use std::sync::Arc;

use crate::JwtFilter;

/// Authenticator shared across middleware instances
#[derive(Clone)]
pub struct JwtState {
    filter: JwtFilter<dyn TokenAuthenticator>,
}

impl JwtState {
    pub fn new(provider: TokenProvider) -> Self {
        Self::from_authenticator(Arc::new(provider))
    }

    pub fn from_authenticator(authenticator: Arc<dyn TokenAuthenticator>) -> Self {
        Self {
            filter: JwtFilter::new(authenticator),
        }
    }
}

/// Bind the bearer token's identity, if any, and continue.
///
/// Never rejects: a missing or invalid token yields an unauthenticated
/// request, not an error response.
pub async fn authenticate(
    State(state): State<JwtState>,
    mut request: Request,
    next: Next,
) -> Response {
    state.filter.authenticate(&mut request);
    next.run(request).await
}
