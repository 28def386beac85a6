//! Google ID token verification through the `tokeninfo` endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::user::{AuthProvider, SocialProfile};

use super::{OAuthVerifier, claim_is_true, is_compact_jws};

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    iss: String,
    sub: String,
    email: Option<String>,
    email_verified: Option<serde_json::Value>,
    name: Option<String>,
    picture: Option<String>,
}

/// Verifies Google ID tokens.
#[derive(Debug, Clone)]
pub struct GoogleVerifier {
    client: reqwest::Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleVerifier {
    /// Creates a verifier expecting tokens issued to `client_id`.
    pub fn new(client: reqwest::Client, client_id: &str, tokeninfo_url: &str) -> Self {
        Self {
            client,
            client_id: client_id.to_string(),
            tokeninfo_url: tokeninfo_url.to_string(),
        }
    }

    fn check(&self, info: TokenInfo) -> AppResult<SocialProfile> {
        if info.aud != self.client_id {
            return Err(AppError::unauthorized("Token was issued to another client"));
        }
        if !GOOGLE_ISSUERS.contains(&info.iss.as_str()) {
            return Err(AppError::unauthorized("Unexpected token issuer"));
        }
        if !claim_is_true(info.email_verified.as_ref()) {
            return Err(AppError::unauthorized("Email is not verified"));
        }

        Ok(SocialProfile {
            provider: AuthProvider::Google,
            subject_id: info.sub,
            email: info.email,
            name: info.name,
            avatar_url: info.picture,
        })
    }
}

#[async_trait]
impl OAuthVerifier for GoogleVerifier {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    async fn verify(&self, id_token: &str) -> AppResult<SocialProfile> {
        if !is_compact_jws(id_token) {
            return Err(AppError::unauthorized("Malformed identity token"));
        }

        let url = format!("{}?id_token={}", self.tokeninfo_url, id_token);
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "Google tokeninfo request failed");
            AppError::unauthorized("Could not verify Google token")
        })?;

        if !response.status().is_success() {
            return Err(AppError::unauthorized("Invalid Google token"));
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            warn!(error = %e, "Unreadable Google tokeninfo response");
            AppError::unauthorized("Could not verify Google token")
        })?;

        self.check(info)
    }
}
