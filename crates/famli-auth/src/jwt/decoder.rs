//! Session token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use famli_core::config::AuthConfig;
use famli_core::error::AppError;

use super::claims::Claims;

/// Validates session tokens signed with an HMAC-SHA256 secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder for the given secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Creates a decoder from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Verifies the signature and time bounds of a session token.
    ///
    /// Every failure is `Unauthorized`.
    pub fn validate_session(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Session token rejected");
            match e.kind() {
                JwtErrorKind::ExpiredSignature => AppError::unauthorized("Session has expired"),
                _ => AppError::unauthorized("Invalid session"),
            }
        })?;

        Ok(data.claims)
    }
}
