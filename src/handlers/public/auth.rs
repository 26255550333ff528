// Public account endpoints: token acquisition only.
// Everything else lives under /api behind the JWT middleware.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::models::user::UserProfile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::account_service::AccountService;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Display name must not be empty"))]
    pub display_name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus identity projection returned by both endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub token: String,
    pub user: UserProfile,
}

/// POST /auth/register - Create a subscriber account and receive a JWT
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<AuthPayload> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    req.validate()?;

    let (user, token) = AccountService::new(&state.db)
        .register(&req.email, &req.password, &req.display_name)
        .await?;

    Ok(ApiResponse::created(AuthPayload {
        token,
        user: UserProfile::from(&user),
    }))
}

/// POST /auth/login - Authenticate and receive a JWT
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AuthPayload> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    req.validate()?;

    let (user, token) = AccountService::new(&state.db)
        .login(&req.email, &req.password)
        .await?;

    Ok(ApiResponse::success(AuthPayload {
        token,
        user: UserProfile::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_short_password() {
        let req = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "short".to_string(),
            display_name: "User".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn register_rejects_bad_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "long-enough-password".to_string(),
            display_name: "User".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
