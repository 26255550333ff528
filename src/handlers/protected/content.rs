use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::database::models::content::ContentPreview;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::content_service::{ContentService, ContentView};
use crate::state::AppState;

/// GET /api/content/:id - A single item, resolved through the access gate.
/// Full body for entitled viewers, paywall preview otherwise.
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(content_id): Path<Uuid>,
) -> ApiResult<ContentView> {
    let view = ContentService::new(&state.db).view(user.id, content_id).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/content - Preview metadata for browsing; never includes media URLs
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ContentPreview>> {
    let previews = ContentService::new(&state.db).list_previews().await?;
    Ok(ApiResponse::success(previews))
}
