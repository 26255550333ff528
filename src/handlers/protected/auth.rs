use axum::extract::{Extension, State};

use crate::handlers::public::auth::AuthPayload;
use crate::database::models::user::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::account_service::AccountService;
use crate::state::AppState;

/// GET /api/auth/whoami - The caller's identity projection
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(user))
}

/// POST /api/auth/promote - Become a creator.
///
/// Returns a fresh token because the role travels in the claims; the old
/// token would keep authenticating the caller as a subscriber until expiry.
pub async fn promote(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<AuthPayload> {
    let (user, token) = AccountService::new(&state.db)
        .promote_to_creator(user.id)
        .await?;

    Ok(ApiResponse::success(AuthPayload {
        token,
        user: UserProfile::from(&user),
    }))
}
