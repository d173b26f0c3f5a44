// src/server.rs
//! HTTP publish trigger.
//!
//! Every request resolves configuration afresh and runs its own pipeline.

use crate::config::{publish_secret, Environment, ProcessEnvironment, PublisherConfig};
use crate::constants::NOTHING_TO_PUBLISH_MESSAGE;
use crate::error::AppError;
use crate::pipeline::{NotionToGhost, PublishOutcome, PublishRunner};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

/// Header carrying the shared secret.
pub const SECRET_HEADER: &str = "x-publish-secret";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub env: Arc<dyn Environment>,
    pub runner: Arc<dyn PublishRunner>,
}

impl AppState {
    pub fn new(env: Arc<dyn Environment>, runner: Arc<dyn PublishRunner>) -> Self {
        Self { env, runner }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(ProcessEnvironment), Arc::new(NotionToGhost))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(publish_handler))
        .route("/api/publish", any(publish_handler))
        .with_state(state)
}

/// Binds `bind` and serves the publish trigger until the process is stopped.
pub async fn serve(bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("Listening for publish requests on {}", listener.local_addr()?);
    axum::serve(listener, build_router(AppState::default())).await?;
    Ok(())
}

async fn publish_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    if method != Method::POST {
        return method_not_allowed();
    }

    if let Some(secret) = publish_secret(state.env.as_ref()) {
        if !is_authorized(&headers, &secret) {
            log::warn!("Rejected publish request: missing or wrong secret");
            return error_response(AppError::Unauthorized);
        }
    }

    let config = match PublisherConfig::resolve(state.env.as_ref()) {
        Ok(config) => config,
        Err(err) => return error_response(err),
    };

    match state.runner.run(config).await {
        Ok(PublishOutcome::NothingToPublish) => {
            (StatusCode::OK, Json(json!({ "message": NOTHING_TO_PUBLISH_MESSAGE }))).into_response()
        }
        Ok(PublishOutcome::Published { count }) => (
            StatusCode::OK,
            Json(json!({ "message": "Publishing complete", "count": count })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Whether the request carries `secret`, either in the dedicated header or as a bearer token.
fn is_authorized(headers: &HeaderMap, secret: &str) -> bool {
    let from_header = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if from_header == Some(secret) {
        return true;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(strip_bearer)
        .is_some_and(|token| token == secret)
}

fn strip_bearer(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
}

fn method_not_allowed() -> Response {
    let mut response = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method Not Allowed" })),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST"));
    response
}

fn error_response(err: AppError) -> Response {
    let status = err.status();
    if status == StatusCode::UNAUTHORIZED {
        return (status, Json(json!({ "error": "Unauthorized" }))).into_response();
    }

    log::error!("Publish request failed: {}", err);
    (
        status,
        Json(json!({ "error": "Internal Server Error", "details": err.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        GHOST_ADMIN_KEY_VAR, GHOST_URL_VAR, NOTION_DATABASE_ID_VAR, NOTION_TOKEN_VAR,
        PUBLISH_SECRET_VAR,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Returns a fixed outcome and counts invocations.
    struct StubRunner {
        outcome: fn() -> Result<PublishOutcome, AppError>,
        calls: AtomicUsize,
    }

    impl StubRunner {
        fn new(outcome: fn() -> Result<PublishOutcome, AppError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl PublishRunner for StubRunner {
        async fn run(&self, _config: PublisherConfig) -> Result<PublishOutcome, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn env(secret: Option<&str>) -> HashMap<String, String> {
        let mut env: HashMap<String, String> = [
            (NOTION_TOKEN_VAR, "secret_abcdefghijklmnopqrstuvwxyz"),
            (NOTION_DATABASE_ID_VAR, "a1b2c3d4e5f67890abcdef1234567890"),
            (GHOST_URL_VAR, "https://blog.example.com"),
            (
                GHOST_ADMIN_KEY_VAR,
                "6489f3a1c2b3d4e5f6a7b8c9:0123456789abcdef0123456789abcdef",
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        if let Some(secret) = secret {
            env.insert(PUBLISH_SECRET_VAR.to_string(), secret.to_string());
        }
        env
    }

    async fn send(
        env: HashMap<String, String>,
        runner: Arc<StubRunner>,
        request: Request<Body>,
    ) -> (StatusCode, HeaderMap, serde_json::Value) {
        let router = build_router(AppState::new(Arc::new(env), runner));
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(uri: &str) -> axum::http::request::Builder {
        Request::builder().method(Method::POST).uri(uri)
    }

    fn published_two() -> Result<PublishOutcome, AppError> {
        Ok(PublishOutcome::Published { count: 2 })
    }

    fn nothing() -> Result<PublishOutcome, AppError> {
        Ok(PublishOutcome::NothingToPublish)
    }

    fn ghost_down() -> Result<PublishOutcome, AppError> {
        Err(AppError::GhostService {
            status: 502,
            message: "Bad Gateway".to_string(),
        })
    }

    #[tokio::test]
    async fn test_get_is_rejected_with_allow_header() {
        let runner = StubRunner::new(published_two);
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/publish")
            .body(Body::empty())
            .unwrap();

        let (status, headers, body) = send(env(None), runner.clone(), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers.get(header::ALLOW).unwrap(), "POST");
        assert_eq!(body, json!({ "error": "Method Not Allowed" }));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_secret_is_unauthorized() {
        let runner = StubRunner::new(published_two);
        let request = post("/").body(Body::empty()).unwrap();

        let (status, _, body) = send(env(Some("hunter2")), runner.clone(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Unauthorized" }));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unauthorized() {
        let runner = StubRunner::new(published_two);
        let request = post("/")
            .header(SECRET_HEADER, "guess")
            .body(Body::empty())
            .unwrap();

        let (status, _, _) = send(env(Some("hunter2")), runner.clone(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_secret_header_is_accepted() {
        let runner = StubRunner::new(published_two);
        let request = post("/api/publish")
            .header(SECRET_HEADER, "hunter2")
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(env(Some("hunter2")), runner.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Publishing complete", "count": 2 }));
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bearer_prefix_is_case_insensitive() {
        let runner = StubRunner::new(nothing);
        let request = post("/")
            .header(header::AUTHORIZATION, "bearer hunter2")
            .body(Body::empty())
            .unwrap();

        let (status, _, body) = send(env(Some("hunter2")), runner, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "No posts with Status = \"Ready to Publish\" found in Notion." })
        );
    }

    #[tokio::test]
    async fn test_no_secret_configured_means_open_access() {
        let runner = StubRunner::new(nothing);
        let request = post("/").body(Body::empty()).unwrap();

        let (status, _, _) = send(env(None), runner.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_configuration_fails_closed() {
        let runner = StubRunner::new(published_two);
        let mut env = env(None);
        env.remove(GHOST_URL_VAR);
        let request = post("/").body(Body::empty()).unwrap();

        let (status, _, body) = send(env, runner.clone(), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(
            body["details"],
            "Missing required environment variable: GHOST_URL"
        );
        assert_eq!(runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_reported() {
        let runner = StubRunner::new(ghost_down);
        let request = post("/").body(Body::empty()).unwrap();

        let (status, _, body) = send(env(None), runner, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["details"],
            "Ghost API returned an error (502): Bad Gateway"
        );
    }

    #[test]
    fn test_strip_bearer() {
        assert_eq!(strip_bearer("Bearer abc"), Some("abc"));
        assert_eq!(strip_bearer("BEARER abc"), Some("abc"));
        assert_eq!(strip_bearer("Basic abc"), None);
        assert_eq!(strip_bearer("abc"), None);
    }
}
