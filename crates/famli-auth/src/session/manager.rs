//! Session lifecycle manager: registration, password login, federated login.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use famli_core::config::AuthConfig;
use famli_core::error::{AppError, ErrorKind};
use famli_core::result::AppResult;
use famli_entity::user::{AuthProvider, CreateUser, User};
use famli_store::{Store, UserStore};

use crate::jwt::{Claims, JwtDecoder, JwtEncoder, SessionToken};
use crate::oauth::OAuthVerifiers;
use crate::password::{PasswordHasher, PasswordValidator};

/// The single message returned for any failed password login.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Result of a successful login or registration.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// The issued session.
    pub session: SessionToken,
}

/// Issues and validates sessions.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn Store>,
    jwt_encoder: Arc<JwtEncoder>,
    jwt_decoder: Arc<JwtDecoder>,
    password_hasher: Arc<PasswordHasher>,
    password_validator: PasswordValidator,
    verifiers: OAuthVerifiers,
    password_ttl: Duration,
    oauth_ttl: Duration,
    /// Verified against when there is no stored hash, so every login costs one verification.
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("verifiers", &self.verifiers)
            .field("password_ttl", &self.password_ttl)
            .field("oauth_ttl", &self.oauth_ttl)
            .finish()
    }
}

impl SessionManager {
    /// Creates a session manager.
    pub fn new(
        store: Arc<dyn Store>,
        password_hasher: Arc<PasswordHasher>,
        verifiers: OAuthVerifiers,
        config: &AuthConfig,
    ) -> AppResult<Self> {
        let dummy_hash = password_hasher.hash_password(&Uuid::new_v4().to_string())?;

        Ok(Self {
            store,
            jwt_encoder: Arc::new(JwtEncoder::from_config(config)),
            jwt_decoder: Arc::new(JwtDecoder::from_config(config)),
            password_hasher,
            password_validator: PasswordValidator::new(config),
            verifiers,
            password_ttl: hours(config.session_ttl_hours),
            oauth_ttl: hours(config.oauth_session_ttl_hours),
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Creates an email/password account and signs it in.
    pub async fn register(&self, email: &str, name: &str, password: &str) -> AppResult<LoginResult> {
        let email = email.trim().to_lowercase();
        self.password_validator
            .validate(password, &[email.as_str(), name])?;

        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("An account with this email already exists"));
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let user = self
            .store
            .create_user(CreateUser {
                email,
                name: name.trim().to_string(),
                password_hash: Some(password_hash),
                provider: AuthProvider::Email,
                provider_subject_id: None,
                avatar_url: None,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        self.sign_in(user, self.password_ttl).await
    }

    /// Signs in with email and password.
    ///
    /// Unknown email, social-only account and wrong password are
    /// indistinguishable to the caller, in message and in hashing work.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let user = self.store.get_user_by_email(email.trim()).await?;
        let stored = user.as_ref().and_then(|u| u.password_hash.as_deref());
        let has_password = stored.is_some();

        let matches = self
            .password_hasher
            .verify_password(password, stored.unwrap_or(&*self.dummy_hash))?;

        match user {
            Some(user) if has_password && matches => {
                info!(user_id = %user.id, "User logged in");
                self.sign_in(user, self.password_ttl).await
            }
            Some(user) => {
                warn!(user_id = %user.id, "Failed password login");
                Err(AppError::unauthorized(INVALID_CREDENTIALS))
            }
            None => Err(AppError::unauthorized(INVALID_CREDENTIALS)),
        }
    }

    /// Signs in with a provider ID token.
    pub async fn oauth_login(&self, provider: AuthProvider, id_token: &str) -> AppResult<LoginResult> {
        let verifier = self.verifiers.get(provider)?;

        let profile = verifier.verify(id_token).await.map_err(|e| {
            warn!(provider = %provider, error = %e, "Identity token rejected");
            if e.is(ErrorKind::Unauthorized) {
                e
            } else {
                AppError::unauthorized("Invalid identity token")
            }
        })?;

        let user = self
            .store
            .create_or_update_social_user(&profile)
            .await
            .map_err(|e| {
                warn!(provider = %provider, error = %e, "Provider profile rejected");
                match e.kind {
                    ErrorKind::Internal | ErrorKind::ServiceUnavailable | ErrorKind::Unauthorized => e,
                    _ => AppError::unauthorized("Invalid identity token"),
                }
            })?;

        info!(user_id = %user.id, provider = %provider, "User logged in with provider");
        self.sign_in(user, self.oauth_ttl).await
    }

    /// Validates a session token.
    pub fn validate_session(&self, token: &str) -> AppResult<Claims> {
        self.jwt_decoder.validate_session(token)
    }

    /// The user behind a validated session.
    pub async fn current_user(&self, user_id: Uuid) -> AppResult<User> {
        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid session"))
    }

    async fn sign_in(&self, mut user: User, ttl: Duration) -> AppResult<LoginResult> {
        let now = Utc::now();
        self.store.touch_last_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let session = self
            .jwt_encoder
            .issue_session(user.id, Some(&user.email), ttl)?;

        Ok(LoginResult { user, session })
    }
}

/// Upper bound for configured session lifetimes (one year).
const MAX_SESSION_HOURS: u64 = 24 * 366;

fn hours(value: u64) -> Duration {
    Duration::hours(value.min(MAX_SESSION_HOURS) as i64)
}
