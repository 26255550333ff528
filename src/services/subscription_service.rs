use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::plan::SubscriptionPlan;
use crate::database::models::subscription::{Subscription, SubscriptionStatus};
use crate::database::Database;

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Plan not found")]
    PlanNotFound,
    #[error("Plan is not active")]
    PlanInactive,
    #[error("Already subscribed to this plan")]
    AlreadySubscribed,
    #[error("Subscription not found")]
    NotFound,
    #[error("Caller does not own this subscription")]
    NotSubscriber,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for SubscriptionError {
    fn from(err: sqlx::Error) -> Self {
        // The partial unique index on (subscriber_id, plan_id) WHERE ACTIVE
        // backs up the application-level duplicate check.
        if let sqlx::Error::Database(ref db) = err {
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                return SubscriptionError::AlreadySubscribed;
            }
        }
        SubscriptionError::Database(DatabaseError::Sqlx(err))
    }
}

pub struct SubscriptionService {
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Subscribe the caller to a plan. The subscription starts ACTIVE and
    /// expires one billing interval from now.
    pub async fn subscribe(
        &self,
        subscriber_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Subscription, SubscriptionError> {
        let plan =
            sqlx::query_as::<_, SubscriptionPlan>("SELECT * FROM subscription_plans WHERE id = $1")
                .bind(plan_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(SubscriptionError::PlanNotFound)?;

        if !plan.is_active {
            return Err(SubscriptionError::PlanInactive);
        }

        let already: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM subscriptions \
             WHERE subscriber_id = $1 AND plan_id = $2 AND status = 'ACTIVE')",
        )
        .bind(subscriber_id)
        .bind(plan_id)
        .fetch_one(&self.pool)
        .await?;

        if already {
            return Err(SubscriptionError::AlreadySubscribed);
        }

        let now = Utc::now();
        let expires_at = now + Duration::days(plan.interval_in_days as i64);

        let subscription = sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions (subscriber_id, plan_id, status, started_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(subscriber_id)
        .bind(plan_id)
        .bind(SubscriptionStatus::Active)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            "User {} subscribed to plan {} until {}",
            subscriber_id,
            plan_id,
            expires_at
        );
        Ok(subscription)
    }

    /// Cancel a subscription owned by the caller
    pub async fn cancel(
        &self,
        caller_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<(), SubscriptionError> {
        let subscription =
            sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
                .bind(subscription_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(SubscriptionError::NotFound)?;

        if subscription.subscriber_id != caller_id {
            return Err(SubscriptionError::NotSubscriber);
        }

        sqlx::query(
            "UPDATE subscriptions SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(subscription_id)
        .bind(SubscriptionStatus::Cancelled)
        .execute(&self.pool)
        .await?;

        tracing::info!("User {} cancelled subscription {}", caller_id, subscription_id);
        Ok(())
    }

    /// The caller's subscriptions, newest first
    pub async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE subscriber_id = $1 ORDER BY created_at DESC",
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }
}
