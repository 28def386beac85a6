//! Public share access handlers. No session required.

use axum::Json;
use axum::extract::{Path, State};

use famli_entity::share::SharedView;
use famli_service::ShareResolution;

use crate::dto::request::ShareVerifyRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ClientMeta, ValidatedJson};
use crate::state::AppState;

/// GET /api/shared/{token}
///
/// Returns either the shared content or a PIN challenge.
pub async fn resolve(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<ShareResolution>>, ApiError> {
    let resolution = state.access_service.resolve(&token, &client).await?;
    Ok(Json(ApiResponse::ok(resolution)))
}

/// POST /api/shared/{token}/verify
pub async fn verify_pin(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    Path(token): Path<String>,
    ValidatedJson(req): ValidatedJson<ShareVerifyRequest>,
) -> Result<Json<ApiResponse<SharedView>>, ApiError> {
    let view = state
        .access_service
        .verify_pin(&token, &req.pin, &client)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}
