use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::database::manager::DatabaseError;
use crate::database::models::user::{Role, User};
use crate::database::Database;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("Administrators cannot be promoted to creator")]
    AdminNotPromotable,
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("Token generation failed: {0}")]
    Token(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                return AccountError::EmailTaken;
            }
        }
        AccountError::Database(DatabaseError::Sqlx(err))
    }
}

pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Register a new subscriber account and issue a token for it
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<(User, String), AccountError> {
        let password_hash =
            auth::hash_password(password).map_err(|e| AccountError::PasswordHash(e.to_string()))?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, display_name, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(email)
        .bind(&password_hash)
        .bind(display_name)
        .bind(Role::Subscriber)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Registered new user {}", user.id);
        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Verify credentials and issue a token. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AccountError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !auth::verify_password(password, &user.password_hash) {
            tracing::warn!("Failed login attempt for user {}", user.id);
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Promote a subscriber to creator. Idempotent for existing creators;
    /// a fresh token is issued either way because the role lives in the
    /// claims.
    pub async fn promote_to_creator(&self, user_id: Uuid) -> Result<(User, String), AccountError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AccountError::NotFound)?;

        let user = match user.role {
            Role::Creator => user,
            Role::Admin => return Err(AccountError::AdminNotPromotable),
            Role::Subscriber => {
                let updated = sqlx::query_as::<_, User>(
                    "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
                )
                .bind(user_id)
                .bind(Role::Creator)
                .fetch_one(&self.pool)
                .await?;

                tracing::info!("User {} promoted to creator", user_id);
                updated
            }
        };

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    fn issue_token(&self, user: &User) -> Result<String, AccountError> {
        let claims = Claims::new(user.id, user.email.clone(), user.role);
        auth::generate_jwt(&claims).map_err(|e| AccountError::Token(e.to_string()))
    }
}
