//! Session token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use famli_core::config::AuthConfig;
use famli_core::error::AppError;

use super::claims::Claims;

/// Signs session tokens with an HMAC-SHA256 secret.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

/// A freshly issued session token.
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    /// The signed token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Lifetime the token was issued with.
    #[serde(skip)]
    pub ttl: Duration,
}

impl JwtEncoder {
    /// Creates an encoder for the given secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Creates an encoder from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Issues a session token for `user_id` valid for `ttl` from now.
    pub fn issue_session(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        ttl: Duration,
    ) -> Result<SessionToken, AppError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            email: email.map(str::to_string),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(SessionToken {
            token,
            expires_at,
            ttl,
        })
    }
}
