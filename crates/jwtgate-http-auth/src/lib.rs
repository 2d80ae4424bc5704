//! Bearer token interceptors for jwtgate
//!
//! This crate plugs a [`TokenAuthenticator`] (normally the
//! [`jwtgate_auth::TokenProvider`]) into a request pipeline. Two variants
//! share one contract:
//!
//! - **Blocking**: [`JwtFilter`] runs once per request on the handling thread
//!   and then calls the next stage exactly once.
//! - **Non-blocking**: [`JwtLayer`] (a tower layer) and [`authenticate`]
//!   (an axum `from_fn_with_state` middleware) bind the identity into the
//!   request before handing it to the inner service.
//!
//! # Failure policy
//!
//! The interceptors **fail open to anonymous**. A missing header, a non-Bearer
//! scheme, or any token error (bad signature, expired, malformed) leaves the
//! request unauthenticated and lets it continue. Whether anonymous access is
//! acceptable is decided downstream by whoever reads the [`Identity`] from
//! the request extensions. A deployment that needs fail-closed behaviour must
//! reject requests without an `Identity` in its own authorization layer.
//!
//! # Usage
//!
//! ```ignore
//! use axum::{routing::get, Router};
//! use jwtgate_http_auth::JwtLayer;
//!
//! let app: Router = Router::new()
//!     .route("/me", get(me))
//!     .layer(JwtLayer::new(provider));
//! ```

mod bearer;
mod filter;
mod layer;
mod middleware;

pub use bearer::{BearerHeader, BEARER_PREFIX};
pub use filter::{AuthRequest, JwtFilter};
pub use layer::{JwtLayer, JwtService};
pub use middleware::{authenticate, JwtState};

pub use jwtgate_auth::{Identity, TokenAuthenticator};

