use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config;
use crate::database::models::user::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from JWT and confirmed against
/// the users table
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// JWT authentication middleware.
///
/// Extracts the bearer token, verifies signature and expiry, and confirms
/// the token subject still exists. Every failure path collapses to a
/// generic 401; the specific reason is only logged.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|reason| {
        tracing::warn!("Authentication rejected: {}", reason);
        ApiError::unauthorized("Authentication required")
    })?;

    let claims = validate_jwt(&token).map_err(|reason| {
        tracing::warn!("Authentication rejected: {}", reason);
        ApiError::unauthorized("Authentication required")
    })?;

    // The token may outlive the account; confirm the subject still exists
    // and pick up the current role rather than trusting a stale claim.
    let row: Option<(Uuid, String, Role)> =
        sqlx::query_as("SELECT id, email, role FROM users WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(state.db.pool())
            .await
            .map_err(|e| {
                tracing::error!("Database error during authentication: {}", e);
                ApiError::unauthorized("Authentication required")
            })?;

    let (id, email, role) = row.ok_or_else(|| {
        tracing::warn!("Authentication rejected: unknown user {}", claims.sub);
        ApiError::unauthorized("Authentication required")
    })?;

    request.extensions_mut().insert(AuthUser { id, email, role });

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "invalid Authorization header encoding".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use the Bearer scheme".to_string())
    }
}

/// Validate a JWT and extract its claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("invalid JWT: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn rejects_wrong_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn rejects_empty_token() {
        let headers = headers_with("Bearer   ");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn rejects_garbage_jwt() {
        assert!(validate_jwt("not-a-token").is_err());
    }
}
