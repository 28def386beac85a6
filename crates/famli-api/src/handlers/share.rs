//! Share link management handlers (owner side).

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use famli_entity::share::ShareLinkAccess;
use famli_service::share::ShareLinkSummary;

use crate::dto::request::CreateShareRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/share-links
pub async fn list_links(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ShareLinkSummary>>>, ApiError> {
    let links = state.share_service.list_links(&auth).await?;
    Ok(Json(ApiResponse::ok(links)))
}

/// POST /api/share-links
pub async fn create_link(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateShareRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareLinkSummary>>), ApiError> {
    let link = state.share_service.create_link(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(link))))
}

/// DELETE /api/share-links/{id}
pub async fn delete_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.share_service.delete_link(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Share link deleted"))))
}

/// GET /api/share-links/{id}/accesses
pub async fn list_accesses(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ShareLinkAccess>>>, ApiError> {
    let accesses = state.share_service.list_accesses(&auth, id).await?;
    Ok(Json(ApiResponse::ok(accesses)))
}
