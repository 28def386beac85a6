//! `AuthUser` extractor: pulls the session from the cookie, validates, and injects context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use famli_core::error::AppError;
use famli_service::context::RequestContext;

use super::client::ClientMeta;
use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The session token, from the session cookie or a Bearer header.
fn session_token(parts: &Parts, state: &AppState) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(state.cookies.name()) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn context_for(parts: &Parts, state: &AppState, token: &str) -> Result<RequestContext, AppError> {
    let claims = state.session_manager.validate_session(token)?;
    Ok(RequestContext::new(
        claims.user_id(),
        claims.email,
        ClientMeta::from_parts(parts),
    ))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts, state)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        Ok(AuthUser(context_for(parts, state, &token)?))
    }
}

/// Like [`AuthUser`] but never rejects: an absent or invalid session is `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = session_token(parts, state).and_then(|token| context_for(parts, state, &token).ok());
        Ok(MaybeAuthUser(ctx))
    }
}
