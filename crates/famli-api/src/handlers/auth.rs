//! Auth handlers: register, login, federated login, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use famli_auth::session::LoginResult;
use famli_entity::analytics::NewAnalyticsEvent;
use famli_entity::user::{AuthProvider, User};
use famli_service::analytics::events;

use crate::dto::request::{IdTokenRequest, LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, AuthResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

type AuthReply = (CookieJar, Json<ApiResponse<AuthResponse>>);

/// Sets the session cookie and shapes the response body.
fn signed_in(state: &AppState, headers: &HeaderMap, jar: CookieJar, result: LoginResult) -> AuthReply {
    let secure = state.is_secure_request(headers);
    let cookie = state
        .cookies
        .issue(result.session.token, result.session.ttl, secure);

    (
        jar.add(cookie),
        Json(ApiResponse::ok(AuthResponse {
            user: result.user,
            expires_at: result.session.expires_at,
        })),
    )
}

fn track_login(state: &AppState, result: &LoginResult, provider: AuthProvider) {
    state.analytics_service.track_detached(
        NewAnalyticsEvent::named(events::USER_LOGIN, Some(result.user.id))
            .with_metadata(json!({ "provider": provider.to_string() })),
    );
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, AuthReply), ApiError> {
    let result = state
        .session_manager
        .register(&req.email, &req.name, &req.password)
        .await?;

    state
        .analytics_service
        .track_detached(NewAnalyticsEvent::named(events::USER_REGISTERED, Some(result.user.id)));

    Ok((StatusCode::CREATED, signed_in(&state, &headers, jar, result)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<AuthReply, ApiError> {
    let result = state.session_manager.login(&req.email, &req.password).await?;
    track_login(&state, &result, AuthProvider::Email);
    Ok(signed_in(&state, &headers, jar, result))
}

async fn federated_login(
    state: AppState,
    provider: AuthProvider,
    headers: HeaderMap,
    jar: CookieJar,
    req: IdTokenRequest,
) -> Result<AuthReply, ApiError> {
    let result = state
        .session_manager
        .oauth_login(provider, &req.id_token)
        .await?;
    track_login(&state, &result, provider);
    Ok(signed_in(&state, &headers, jar, result))
}

/// POST /api/auth/google
pub async fn google(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<IdTokenRequest>,
) -> Result<AuthReply, ApiError> {
    federated_login(state, AuthProvider::Google, headers, jar, req).await
}

/// POST /api/auth/apple
pub async fn apple(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<IdTokenRequest>,
) -> Result<AuthReply, ApiError> {
    federated_login(state, AuthProvider::Apple, headers, jar, req).await
}

/// POST /api/auth/logout
///
/// Always succeeds; sessions are stateless so clearing the cookie is enough.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let secure = state.is_secure_request(&headers);
    (
        jar.add(state.cookies.clear(secure)),
        Json(ApiResponse::ok(MessageResponse::new("Logged out"))),
    )
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.session_manager.current_user(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}
