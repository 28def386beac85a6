//! Settings handlers.

use axum::Json;
use axum::extract::State;

use famli_core::error::AppError;
use famli_entity::settings::Settings;

use crate::dto::request::{MAX_EMERGENCY_MESSAGE, UpdateSettingsRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/settings
pub async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Settings>>, ApiError> {
    let settings = state.settings_service.get_settings(&auth).await?;
    Ok(Json(ApiResponse::ok(settings)))
}

/// PUT /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<Settings>>, ApiError> {
    if let Some(Some(message)) = &req.emergency_message {
        if message.chars().count() > MAX_EMERGENCY_MESSAGE {
            return Err(AppError::validation("Emergency message is too long").into());
        }
    }

    let settings = state
        .settings_service
        .update_settings(&auth, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(settings)))
}
