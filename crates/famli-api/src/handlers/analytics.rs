//! Analytics handlers: client event tracking and admin reports.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use famli_entity::analytics::{AnalyticsEvent, AnalyticsSummary, DailyStat, NewAnalyticsEvent};

use crate::dto::request::{DailyQuery, RecentQuery, TrackEventRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/analytics/track
///
/// Accepted whether or not the caller is signed in.
pub async fn track(
    State(state): State<AppState>,
    MaybeAuthUser(ctx): MaybeAuthUser,
    ValidatedJson(req): ValidatedJson<TrackEventRequest>,
) -> StatusCode {
    let event = NewAnalyticsEvent {
        event_type: req.event_type,
        user_id: ctx.map(|c| c.user_id),
        path: req.path,
        metadata: req.metadata,
    };
    state.analytics_service.track(event).await;
    StatusCode::ACCEPTED
}

/// GET /api/analytics/summary
pub async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AnalyticsSummary>>, ApiError> {
    let summary = state.analytics_service.summary(&auth).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/analytics/recent?limit=
pub async fn recent(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RecentQuery>,
) -> Result<Json<ApiResponse<Vec<AnalyticsEvent>>>, ApiError> {
    let events = state.analytics_service.recent(&auth, query.limit).await?;
    Ok(Json(ApiResponse::ok(events)))
}

/// GET /api/analytics/daily?days=
pub async fn daily(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DailyQuery>,
) -> Result<Json<ApiResponse<Vec<DailyStat>>>, ApiError> {
    let stats = state.analytics_service.daily(&auth, query.days).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
