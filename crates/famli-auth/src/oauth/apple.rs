//! Sign in with Apple ID token verification against Apple's published keys.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::user::{AuthProvider, SocialProfile};

use super::{OAuthVerifier, claim_is_true};

/// Issuer of every Apple ID token.
pub const APPLE_ISSUER: &str = "https://appleid.apple.com";

/// Minimum time between two key fetches triggered by unknown `kid`s.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct AppleClaims {
    sub: String,
    email: Option<String>,
    email_verified: Option<serde_json::Value>,
}

/// Verifies Apple ID tokens locally (RS256) with cached signing keys.
#[derive(Clone)]
pub struct AppleVerifier {
    client: reqwest::Client,
    client_id: String,
    keys_url: String,
    /// Signing keys by `kid`.
    keys: Cache<String, Jwk>,
    /// When keys were last fetched. Held while fetching.
    last_fetch: Arc<Mutex<Option<Instant>>>,
}

impl std::fmt::Debug for AppleVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppleVerifier")
            .field("client_id", &self.client_id)
            .field("keys_url", &self.keys_url)
            .field("cached_keys", &self.keys.entry_count())
            .finish()
    }
}

impl AppleVerifier {
    /// Creates a verifier expecting tokens issued to `client_id`.
    pub fn new(client: reqwest::Client, client_id: &str, keys_url: &str, key_ttl: Duration) -> Self {
        Self {
            client,
            client_id: client_id.to_string(),
            keys_url: keys_url.to_string(),
            keys: Cache::builder()
                .max_capacity(64)
                .time_to_live(key_ttl)
                .build(),
            last_fetch: Arc::new(Mutex::new(None)),
        }
    }

    /// Seeds the key cache, replacing keys with the same `kid`.
    pub async fn insert_keys(&self, set: JwkSet) {
        for key in set.keys {
            if let Some(kid) = key.common.key_id.clone() {
                self.keys.insert(kid, key).await;
            }
        }
    }

    async fn fetch_keys(&self) -> AppResult<()> {
        let response = self
            .client
            .get(&self.keys_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, "Apple keys request failed");
                AppError::unauthorized("Could not verify Apple token")
            })?;

        let set: JwkSet = response.json().await.map_err(|e| {
            warn!(error = %e, "Unreadable Apple keys response");
            AppError::unauthorized("Could not verify Apple token")
        })?;

        debug!(count = set.keys.len(), "Fetched Apple signing keys");
        self.insert_keys(set).await;
        Ok(())
    }

    /// The signing key for `kid`, refreshing the cache on a miss.
    ///
    /// Refreshes are at most one per [`MIN_REFETCH_INTERVAL`], so tokens
    /// with made-up `kid`s cannot drive outbound requests.
    async fn key_for(&self, kid: &str) -> AppResult<Jwk> {
        if let Some(key) = self.keys.get(kid).await {
            return Ok(key);
        }

        let mut last_fetch = self.last_fetch.lock().await;
        if let Some(key) = self.keys.get(kid).await {
            return Ok(key);
        }
        if last_fetch.is_some_and(|at| at.elapsed() < MIN_REFETCH_INTERVAL) {
            debug!(kid, "Apple keys refreshed recently, not refetching");
            return Err(AppError::unauthorized("Unknown Apple signing key"));
        }
        *last_fetch = Some(Instant::now());
        self.fetch_keys().await?;
        drop(last_fetch);

        self.keys
            .get(kid)
            .await
            .ok_or_else(|| AppError::unauthorized("Unknown Apple signing key"))
    }
}

#[async_trait]
impl OAuthVerifier for AppleVerifier {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Apple
    }

    async fn verify(&self, id_token: &str) -> AppResult<SocialProfile> {
        let header =
            decode_header(id_token).map_err(|_| AppError::unauthorized("Malformed identity token"))?;
        if header.alg != Algorithm::RS256 {
            return Err(AppError::unauthorized("Unexpected token algorithm"));
        }
        let kid = header
            .kid
            .ok_or_else(|| AppError::unauthorized("Identity token has no key id"))?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|_| AppError::unauthorized("Unusable Apple signing key"))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[APPLE_ISSUER]);
        validation.set_audience(&[self.client_id.as_str()]);

        let claims = decode::<AppleClaims>(id_token, &key, &validation)
            .map_err(|e| {
                debug!(error = %e, "Apple token rejected");
                AppError::unauthorized("Invalid Apple token")
            })?
            .claims;

        if claims.email_verified.is_some() && !claim_is_true(claims.email_verified.as_ref()) {
            return Err(AppError::unauthorized("Apple email is not verified"));
        }

        Ok(SocialProfile {
            provider: AuthProvider::Apple,
            subject_id: claims.sub,
            email: claims.email,
            name: None,
            avatar_url: None,
        })
    }
}
