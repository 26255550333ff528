use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::purchase::Purchase;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::purchase_service::PurchaseService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub content_id: Uuid,
}

/// POST /api/purchases - Buy one content item outright
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> ApiResult<Purchase> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let purchase = PurchaseService::new(&state.db)
        .purchase(user.id, req.content_id)
        .await?;

    Ok(ApiResponse::created(purchase))
}

/// GET /api/purchases - The caller's purchases
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Purchase>> {
    let purchases = PurchaseService::new(&state.db).list_for_buyer(user.id).await?;
    Ok(ApiResponse::success(purchases))
}
