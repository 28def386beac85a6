//! Federated identity verification.
//!
//! A client signs in with a provider and hands us the provider's ID token.
//! An [`OAuthVerifier`] turns that token into a verified [`SocialProfile`].

pub mod apple;
pub mod google;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use famli_core::config::OAuthConfig;
use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::user::{AuthProvider, SocialProfile};

pub use apple::AppleVerifier;
pub use google::GoogleVerifier;

/// Verifies provider ID tokens.
#[async_trait]
pub trait OAuthVerifier: Send + Sync + 'static {
    /// The provider this verifier handles.
    fn provider(&self) -> AuthProvider;

    /// Verifies `id_token` and returns the identity it asserts.
    ///
    /// Any failure is `Unauthorized`.
    async fn verify(&self, id_token: &str) -> AppResult<SocialProfile>;
}

/// The set of configured verifiers, one per provider.
#[derive(Clone, Default)]
pub struct OAuthVerifiers {
    google: Option<Arc<dyn OAuthVerifier>>,
    apple: Option<Arc<dyn OAuthVerifier>>,
}

impl std::fmt::Debug for OAuthVerifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthVerifiers")
            .field("google", &self.google.is_some())
            .field("apple", &self.apple.is_some())
            .finish()
    }
}

impl OAuthVerifiers {
    /// Builds verifiers for every provider with a client id configured.
    pub fn from_config(config: &OAuthConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        let mut verifiers = Self::default();

        if let Some(client_id) = config.google_client_id.as_deref().filter(|s| !s.is_empty()) {
            verifiers = verifiers.with_verifier(Arc::new(GoogleVerifier::new(
                client.clone(),
                client_id,
                &config.google_tokeninfo_url,
            )));
        }

        if let Some(client_id) = config.apple_client_id.as_deref().filter(|s| !s.is_empty()) {
            verifiers = verifiers.with_verifier(Arc::new(AppleVerifier::new(
                client,
                client_id,
                &config.apple_keys_url,
                Duration::from_secs(config.jwks_cache_ttl_seconds),
            )));
        }

        Ok(verifiers)
    }

    /// Registers `verifier` for its provider, replacing any previous one.
    pub fn with_verifier(mut self, verifier: Arc<dyn OAuthVerifier>) -> Self {
        match verifier.provider() {
            AuthProvider::Google => self.google = Some(verifier),
            AuthProvider::Apple => self.apple = Some(verifier),
            AuthProvider::Email => {}
        }
        self
    }

    /// The verifier for `provider`, or `ServiceUnavailable` if not configured.
    pub fn get(&self, provider: AuthProvider) -> AppResult<&Arc<dyn OAuthVerifier>> {
        let verifier = match provider {
            AuthProvider::Google => self.google.as_ref(),
            AuthProvider::Apple => self.apple.as_ref(),
            AuthProvider::Email => {
                return Err(AppError::validation("Email is not a federated provider"));
            }
        };

        verifier.ok_or_else(|| {
            AppError::service_unavailable(format!("{provider} sign-in is not configured"))
        })
    }
}

/// Reads a provider boolean claim that may arrive as `true` or `"true"`.
pub(crate) fn claim_is_true(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Whether `token` only contains characters allowed in a compact JWS.
pub(crate) fn is_compact_jws(token: &str) -> bool {
    !token.is_empty()
        && token.split('.').count() == 3
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

#[cfg(test)]
mod tests {
    use famli_core::error::ErrorKind;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unconfigured_provider_is_unavailable() {
        let verifiers = OAuthVerifiers::from_config(&OAuthConfig::default()).unwrap();
        let err = verifiers.get(AuthProvider::Google).err().unwrap();
        assert!(err.is(ErrorKind::ServiceUnavailable));
        let err = verifiers.get(AuthProvider::Apple).err().unwrap();
        assert!(err.is(ErrorKind::ServiceUnavailable));
    }

    #[test]
    fn test_configured_provider_is_available() {
        let config = OAuthConfig {
            google_client_id: Some("client.apps.googleusercontent.com".to_string()),
            ..OAuthConfig::default()
        };
        let verifiers = OAuthVerifiers::from_config(&config).unwrap();
        assert!(verifiers.get(AuthProvider::Google).is_ok());
        assert!(verifiers.get(AuthProvider::Apple).is_err());
    }

    #[test]
    fn test_claim_is_true_accepts_bool_and_string() {
        assert!(claim_is_true(Some(&json!(true))));
        assert!(claim_is_true(Some(&json!("true"))));
        assert!(!claim_is_true(Some(&json!("false"))));
        assert!(!claim_is_true(Some(&json!(false))));
        assert!(!claim_is_true(None));
    }

    #[test]
    fn test_compact_jws_shape() {
        assert!(is_compact_jws("aGVhZA.Ym9keQ.c2ln"));
        assert!(!is_compact_jws("aGVhZA.Ym9keQ"));
        assert!(!is_compact_jws("a.b.c&x=1"));
        assert!(!is_compact_jws(""));
    }
}
