use axum::{extract::Request, middleware::Next, response::Response};

use crate::database::models::user::Role;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Role gate for creator-only routes. Must run after JWT authentication;
/// a missing AuthUser means the chain is mis-ordered and reads as 401.
pub async fn require_creator_middleware(
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    match user.role {
        Role::Creator => Ok(next.run(request).await),
        Role::Subscriber | Role::Admin => {
            tracing::debug!("Creator gate rejected user {} with role {:?}", user.id, user.role);
            Err(ApiError::forbidden("Creator role required"))
        }
    }
}
