use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::plan::{ContentAccess, SubscriptionPlan};
use crate::database::Database;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Plan not found")]
    NotFound,
    #[error("Caller does not own this plan")]
    NotOwner,
    #[error("Plan has active subscriptions")]
    ActiveSubscriptions,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for PlanError {
    fn from(err: sqlx::Error) -> Self {
        PlanError::Database(DatabaseError::Sqlx(err))
    }
}

/// Fields of a new plan. The owner is always the authenticated caller,
/// never part of the payload.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub interval_in_days: i32,
    pub is_active: bool,
    pub content_access: ContentAccess,
}

/// Partial update; only supplied fields are applied
#[derive(Debug, Clone, Default)]
pub struct PlanChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub interval_in_days: Option<i32>,
    pub is_active: Option<bool>,
    pub content_access: Option<ContentAccess>,
}

pub struct PlanService {
    pool: PgPool,
}

impl PlanService {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// All plans owned by the creator, newest first
    pub async fn list_for_creator(&self, creator_id: Uuid) -> Result<Vec<SubscriptionPlan>, PlanError> {
        let plans = sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT * FROM subscription_plans WHERE creator_id = $1 ORDER BY created_at DESC",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    /// Fetch a plan by id. Readable by any authenticated user; plans are
    /// the marketing surface shown on paywalls.
    pub async fn get(&self, plan_id: Uuid) -> Result<SubscriptionPlan, PlanError> {
        sqlx::query_as::<_, SubscriptionPlan>("SELECT * FROM subscription_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PlanError::NotFound)
    }

    /// Active plans for a creator, used to populate paywall previews
    pub async fn active_for_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Vec<SubscriptionPlan>, DatabaseError> {
        let plans = sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT * FROM subscription_plans \
             WHERE creator_id = $1 AND is_active = TRUE ORDER BY price ASC",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    /// Fetch a plan the caller must own. Absence reads as 404 before
    /// ownership reads as 403, and both precede any payload concerns.
    pub async fn get_owned(
        &self,
        caller_id: Uuid,
        plan_id: Uuid,
    ) -> Result<SubscriptionPlan, PlanError> {
        let plan = self.get(plan_id).await?;
        if plan.creator_id != caller_id {
            return Err(PlanError::NotOwner);
        }
        Ok(plan)
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        plan: NewPlan,
    ) -> Result<SubscriptionPlan, PlanError> {
        let created = sqlx::query_as::<_, SubscriptionPlan>(
            "INSERT INTO subscription_plans \
             (creator_id, name, price, description, features, interval_in_days, is_active, content_access) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(creator_id)
        .bind(&plan.name)
        .bind(plan.price)
        .bind(&plan.description)
        .bind(&plan.features)
        .bind(plan.interval_in_days)
        .bind(plan.is_active)
        .bind(Json(plan.content_access))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Creator {} created plan {}", creator_id, created.id);
        Ok(created)
    }

    /// Apply a partial update. 404 before 403: an absent plan is reported
    /// as missing even to non-owners.
    pub async fn update(
        &self,
        caller_id: Uuid,
        plan_id: Uuid,
        changes: PlanChanges,
    ) -> Result<SubscriptionPlan, PlanError> {
        self.get_owned(caller_id, plan_id).await?;

        let updated = sqlx::query_as::<_, SubscriptionPlan>(
            "UPDATE subscription_plans SET \
             name = COALESCE($2, name), \
             price = COALESCE($3, price), \
             description = COALESCE($4, description), \
             features = COALESCE($5, features), \
             interval_in_days = COALESCE($6, interval_in_days), \
             is_active = COALESCE($7, is_active), \
             content_access = COALESCE($8, content_access), \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(plan_id)
        .bind(changes.name)
        .bind(changes.price)
        .bind(changes.description)
        .bind(changes.features)
        .bind(changes.interval_in_days)
        .bind(changes.is_active)
        .bind(changes.content_access.map(Json))
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a plan unless any ACTIVE subscription references it.
    ///
    /// The existence check, the guard count and the delete run inside one
    /// transaction with the plan row locked, so a subscription created
    /// concurrently cannot slip between the count and the delete.
    pub async fn delete(&self, caller_id: Uuid, plan_id: Uuid) -> Result<(), PlanError> {
        let mut tx = self.pool.begin().await?;

        let plan = sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT * FROM subscription_plans WHERE id = $1 FOR UPDATE",
        )
        .bind(plan_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PlanError::NotFound)?;

        if plan.creator_id != caller_id {
            return Err(PlanError::NotOwner);
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE plan_id = $1 AND status = 'ACTIVE'",
        )
        .bind(plan_id)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(PlanError::ActiveSubscriptions);
        }

        sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Creator {} deleted plan {}", caller_id, plan_id);
        Ok(())
    }
}
