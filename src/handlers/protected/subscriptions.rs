use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::subscription::Subscription;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::subscription_service::SubscriptionService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub plan_id: Uuid,
}

/// POST /api/subscriptions - Subscribe the caller to a plan
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> ApiResult<Subscription> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let subscription = SubscriptionService::new(&state.db)
        .subscribe(user.id, req.plan_id)
        .await?;

    Ok(ApiResponse::created(subscription))
}

/// DELETE /api/subscriptions/:id - Cancel the caller's subscription
pub async fn cancel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(subscription_id): Path<Uuid>,
) -> ApiResult<()> {
    SubscriptionService::new(&state.db)
        .cancel(user.id, subscription_id)
        .await?;
    Ok(ApiResponse::<()>::no_content())
}

/// GET /api/subscriptions - The caller's subscriptions
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Subscription>> {
    let subscriptions = SubscriptionService::new(&state.db)
        .list_for_subscriber(user.id)
        .await?;
    Ok(ApiResponse::success(subscriptions))
}
