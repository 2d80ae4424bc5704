//! Non-blocking interceptor as a tower layer
//!
//! The identity is resolved synchronously inside `call` and travels with the
//! request in its extensions; the inner service's future is returned as-is,
//! so dropping it cancels the request and nothing else.

use std::sync::Arc;
use std::task::{Context, Poll};

use http::Request;
use jwtgate_auth::{TokenAuthenticator, TokenProvider};
use tower::{Layer, Service};

use crate::JwtFilter;

/// Layer that applies [`JwtService`] to an inner service
pub struct JwtLayer<A: ?Sized = TokenProvider> {
    filter: JwtFilter<A>,
}

impl<A: ?Sized> Clone for JwtLayer<A> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
        }
    }
}

impl JwtLayer<TokenProvider> {
    pub fn new(provider: TokenProvider) -> Self {
        Self::from_authenticator(Arc::new(provider))
    }
}

impl<A: TokenAuthenticator + ?Sized> JwtLayer<A> {
    pub fn from_authenticator(authenticator: Arc<A>) -> Self {
        Self {
            filter: JwtFilter::new(authenticator),
        }
    }
}

impl<S, A: ?Sized> Layer<S> for JwtLayer<A> {
    type Service = JwtService<S, A>;

    fn layer(&self, inner: S) -> Self::Service {
        JwtService {
            inner,
            filter: self.filter.clone(),
        }
    }
}

/// Service that binds the bearer token's identity, then calls `inner`
pub struct JwtService<S, A: ?Sized = TokenProvider> {
    inner: S,
    filter: JwtFilter<A>,
}

impl<S: Clone, A: ?Sized> Clone for JwtService<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<S, A, B> Service<Request<B>> for JwtService<S, A>
where
    S: Service<Request<B>>,
    A: TokenAuthenticator + ?Sized,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        self.filter.authenticate(&mut request);
        self.inner.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jwtgate_auth::{Identity, SecretKey};
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    const TEST_SECRET: &[u8] = b"layer_test_secret_0123456789_abcdefghi";

    fn provider() -> TokenProvider {
        TokenProvider::new(
            SecretKey::from_bytes(TEST_SECRET).unwrap(),
            Duration::minutes(1),
            Duration::minutes(10),
        )
        .unwrap()
    }

    async fn echo_identity(request: Request<()>) -> Result<Option<Identity>, Infallible> {
        Ok(request.extensions().get::<Identity>().cloned())
    }

    #[tokio::test]
    async fn test_layer_binds_identity() {
        let provider = provider();
        let identity = Identity::new("u1", ["USER"]);
        let token = provider.create_access_token(&identity).unwrap();

        let service = JwtLayer::new(provider).layer(service_fn(echo_identity));
        let request = Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .body(())
            .unwrap();

        assert_eq!(service.oneshot(request).await.unwrap(), Some(identity));
    }

    #[tokio::test]
    async fn test_layer_passes_through_unauthenticated() {
        for authorization in [None, Some("Basic xyz"), Some("Bearer not-a-real-token")] {
            let service = JwtLayer::new(provider()).layer(service_fn(echo_identity));

            let mut builder = Request::builder();
            if let Some(value) = authorization {
                builder = builder.header("Authorization", value);
            }

            let seen = service.oneshot(builder.body(()).unwrap()).await.unwrap();
            assert_eq!(seen, None);
        }
    }
}
