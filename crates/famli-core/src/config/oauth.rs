//! Federated login configuration.

use serde::{Deserialize, Serialize};

/// Google and Apple sign-in settings.
///
/// A provider whose client id is unset is treated as not configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Google OAuth client id (the expected `aud`).
    #[serde(default)]
    pub google_client_id: Option<String>,
    /// Apple services id (the expected `aud`).
    #[serde(default)]
    pub apple_client_id: Option<String>,
    /// Google token verification endpoint.
    #[serde(default = "default_google_tokeninfo_url")]
    pub google_tokeninfo_url: String,
    /// Apple public signing keys endpoint.
    #[serde(default = "default_apple_keys_url")]
    pub apple_keys_url: String,
    /// Timeout for outbound provider calls, in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// How long fetched Apple keys are cached, in seconds.
    #[serde(default = "default_jwks_ttl")]
    pub jwks_cache_ttl_seconds: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            google_client_id: None,
            apple_client_id: None,
            google_tokeninfo_url: default_google_tokeninfo_url(),
            apple_keys_url: default_apple_keys_url(),
            request_timeout_seconds: default_timeout(),
            jwks_cache_ttl_seconds: default_jwks_ttl(),
        }
    }
}

fn default_google_tokeninfo_url() -> String {
    "https://oauth2.googleapis.com/tokeninfo".to_string()
}

fn default_apple_keys_url() -> String {
    "https://appleid.apple.com/auth/keys".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_jwks_ttl() -> u64 {
    3600
}
