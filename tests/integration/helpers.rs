//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use famli_api::{AppState, build_app};
use famli_auth::oauth::{OAuthVerifier, OAuthVerifiers};
use famli_core::config::AppConfig;
use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_crypto::{FieldCodec, KeyParams};
use famli_entity::user::{AuthProvider, SocialProfile};
use famli_store::MemoryStore;

/// A password that passes the strength check.
pub const STRONG_PASSWORD: &str = "correct-horse-battery-staple";

/// Email configured as analytics admin.
pub const ADMIN_EMAIL: &str = "admin@famli.app";

/// Accepts `google-<subject>` tokens and rejects everything else.
pub struct FakeGoogle;

#[async_trait]
impl OAuthVerifier for FakeGoogle {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    async fn verify(&self, id_token: &str) -> AppResult<SocialProfile> {
        let subject = id_token
            .strip_prefix("google-")
            .ok_or_else(|| AppError::unauthorized("Invalid identity token"))?;
        Ok(SocialProfile {
            provider: AuthProvider::Google,
            subject_id: subject.to_string(),
            email: Some(format!("{subject}@gmail.com")),
            name: Some(subject.to_string()),
            avatar_url: None,
        })
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store behind the router, for direct inspection
    pub store: Arc<MemoryStore>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over an empty in-memory store
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Like [`TestApp::new`], with config tweaks applied before the state is built
    pub fn with_config(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.auth.hash_memory_kib = 1024;
        config.auth.hash_iterations = 1;
        config.auth.hash_parallelism = 1;
        config.share.base_url = "https://famli.test".to_string();
        config.analytics.admin_emails = vec![ADMIN_EMAIL.to_string()];
        configure(&mut config);

        let codec = FieldCodec::new(
            "integration-codec-secret",
            KeyParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        )
        .expect("Failed to build codec");

        let store = Arc::new(MemoryStore::new());
        let verifiers = OAuthVerifiers::default().with_verifier(Arc::new(FakeGoogle));

        let state = AppState::new(config.clone(), store.clone(), Arc::new(codec), verifiers)
            .expect("Failed to build state");

        Self {
            router: build_app(state),
            store,
            config,
        }
    }

    /// Register a user and return the session token
    pub async fn register(&self, email: &str, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({
                    "email": email,
                    "name": name,
                    "password": STRONG_PASSWORD,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );

        response
            .session_cookie
            .expect("No session cookie in register response")
    }

    /// Make an HTTP request to the test app, authenticating with the session cookie
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, session, &[])
            .await
    }

    /// Like [`TestApp::request`] with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = session {
            req = req.header(
                header::COOKIE,
                format!("{}={}", self.config.auth.cookie_name, token),
            );
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect();

        let prefix = format!("{}=", self.config.auth.cookie_name);
        let session_cookie = set_cookies.iter().find_map(|c| {
            c.split(';')
                .next()
                .and_then(|pair| pair.strip_prefix(prefix.as_str()))
                .filter(|v| !v.is_empty())
                .map(String::from)
        });

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            set_cookies,
            session_cookie,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Raw `Set-Cookie` headers
    pub set_cookies: Vec<String>,
    /// Value of a non-empty session cookie, if one was set
    pub session_cookie: Option<String>,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` member of an error envelope
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
