//! Box item handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use famli_entity::item::BoxItem;

use crate::dto::request::{CreateBoxItemRequest, UpdateBoxItemRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/items
pub async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<BoxItem>>>, ApiError> {
    let items = state.item_service.list_items(&auth).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BoxItem>>, ApiError> {
    let item = state.item_service.get_item(&auth, id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/items
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBoxItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BoxItem>>), ApiError> {
    let item = state.item_service.create_item(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(item))))
}

/// PUT /api/items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateBoxItemRequest>,
) -> Result<Json<ApiResponse<BoxItem>>, ApiError> {
    let item = state.item_service.update_item(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// DELETE /api/items/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.item_service.delete_item(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Item deleted"))))
}
