//! Guardian handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use famli_entity::guardian::Guardian;

use crate::dto::request::CreateGuardianRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/guardians
pub async fn list_guardians(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Guardian>>>, ApiError> {
    let guardians = state.guardian_service.list_guardians(&auth).await?;
    Ok(Json(ApiResponse::ok(guardians)))
}

/// POST /api/guardians
pub async fn add_guardian(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateGuardianRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Guardian>>), ApiError> {
    let guardian = state.guardian_service.add_guardian(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(guardian))))
}

/// DELETE /api/guardians/{id}
pub async fn delete_guardian(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.guardian_service.delete_guardian(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Guardian deleted"))))
}
