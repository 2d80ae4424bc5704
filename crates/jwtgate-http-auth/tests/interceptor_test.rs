//! Router-level tests for the bearer token interceptors
//!
//! Every scenario must reach the handler: the interceptors only decide
//! whether an identity is attached, never whether the request proceeds.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use jwtgate_auth::{claims, jwt, Identity, SecretKey, TokenProvider};
use jwtgate_http_auth::{authenticate, JwtLayer, JwtState};
use tower::ServiceExt; // For oneshot()

const TEST_SECRET: &[u8] = b"integration_test_secret_0123456789_abcdef";

fn provider() -> TokenProvider {
    TokenProvider::new(
        SecretKey::from_bytes(TEST_SECRET).unwrap(),
        Duration::minutes(1),
        Duration::minutes(10),
    )
    .unwrap()
}

// Echoes whatever identity the interceptor bound (null when anonymous)
async fn whoami(request: Request) -> Json<Option<Identity>> {
    Json(request.extensions().get::<Identity>().cloned())
}

fn layered_app() -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .layer(JwtLayer::new(provider()))
}

fn middleware_app() -> Router {
    let state = JwtState::new(provider());

    Router::new()
        .route("/whoami", get(whoami))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, Option<Identity>) {
    let mut builder = Request::builder().uri("/whoami");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }

    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let identity: Option<Identity> = serde_json::from_slice(&body).unwrap();

    (status, identity)
}

fn apps() -> [Router; 2] {
    [layered_app(), middleware_app()]
}

#[tokio::test]
async fn test_valid_access_token_binds_identity() {
    let identity = Identity::new("u1", ["USER"]);
    let token = provider().create_access_token(&identity).unwrap();
    let header = format!("Bearer {}", token);

    for app in apps() {
        let (status, seen) = call(app, Some(&header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen, Some(identity.clone()));
    }
}

#[tokio::test]
async fn test_valid_refresh_token_also_authenticates() {
    let identity = Identity::new("u2", ["USER", "ADMIN"]);
    let token = provider().create_refresh_token(&identity).unwrap();
    let header = format!("Bearer {}", token);

    for app in apps() {
        let (_, seen) = call(app, Some(&header)).await;
        assert_eq!(seen, Some(identity.clone()));
    }
}

#[tokio::test]
async fn test_missing_authorization_header() {
    for app in apps() {
        let (status, seen) = call(app, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen, None);
    }
}

#[tokio::test]
async fn test_basic_scheme_passes_through() {
    for app in apps() {
        let (status, seen) = call(app, Some("Basic xyz")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen, None);
    }
}

#[tokio::test]
async fn test_invalid_token_is_swallowed() {
    for app in apps() {
        let (status, seen) = call(app, Some("Bearer not-a-real-token")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen, None);
    }
}

#[tokio::test]
async fn test_lowercase_scheme_is_not_bearer() {
    let token = provider()
        .create_access_token(&Identity::new("u1", ["USER"]))
        .unwrap();
    let header = format!("bearer {}", token);

    for app in apps() {
        let (status, seen) = call(app, Some(&header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen, None);
    }
}

#[tokio::test]
async fn test_expired_token_is_swallowed() {
    let key = SecretKey::from_bytes(TEST_SECRET).unwrap();
    let claims = claims::encode(&Identity::new("u1", ["USER"])).unwrap();
    let issued = Utc::now().timestamp_millis() - 120_000;
    let token = jwt::sign_at(claims, Duration::minutes(1), &key, issued).unwrap();
    let header = format!("Bearer {}", token);

    for app in apps() {
        let (status, seen) = call(app, Some(&header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen, None);
    }
}

#[tokio::test]
async fn test_token_from_other_key_is_swallowed() {
    let other = TokenProvider::new(
        SecretKey::from_bytes(b"some_other_secret_key_0123456789_abcdef").unwrap(),
        Duration::minutes(1),
        Duration::minutes(10),
    )
    .unwrap();
    let token = other
        .create_access_token(&Identity::new("u1", ["ADMIN"]))
        .unwrap();
    let header = format!("Bearer {}", token);

    for app in apps() {
        let (status, seen) = call(app, Some(&header)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(seen, None);
    }
}
