use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::content::{ContentItem, ContentPreview};
use crate::database::models::plan::{ContentAccess, SubscriptionPlan};
use crate::database::Database;
use crate::services::access::{self, AccessDecision};
use crate::services::plan_service::PlanService;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Content not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        ContentError::Database(DatabaseError::Sqlx(err))
    }
}

/// What a viewer receives for a content item: the full record, or a
/// paywalled preview with the creator's active plans attached.
#[derive(Debug, Serialize)]
#[serde(tag = "access")]
pub enum ContentView {
    #[serde(rename = "full")]
    Full { item: ContentItem },
    #[serde(rename = "preview")]
    Preview {
        item: ContentPreview,
        plans: Vec<SubscriptionPlan>,
    },
}

pub struct ContentService {
    db: Database,
    pool: PgPool,
}

impl ContentService {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            pool: db.pool().clone(),
        }
    }

    /// Fetch an item and resolve it through the access gate for the viewer
    pub async fn view(&self, viewer_id: Uuid, content_id: Uuid) -> Result<ContentView, ContentError> {
        let item = sqlx::query_as::<_, ContentItem>("SELECT * FROM content_items WHERE id = $1")
            .bind(content_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ContentError::NotFound)?;

        let unlocked = self.unlocked_accesses(viewer_id).await?;
        let has_purchased = self.has_purchased(viewer_id, content_id).await?;

        match access::evaluate(viewer_id, &item, &unlocked, has_purchased) {
            AccessDecision::Full => Ok(ContentView::Full { item }),
            AccessDecision::Preview => {
                let plans = PlanService::new(&self.db)
                    .active_for_creator(item.creator_id)
                    .await?;

                Ok(ContentView::Preview {
                    item: ContentPreview::from(&item),
                    plans,
                })
            }
        }
    }

    /// Preview metadata for all content, newest first. Listings never leak
    /// media URLs regardless of the viewer's entitlements.
    pub async fn list_previews(&self) -> Result<Vec<ContentPreview>, ContentError> {
        let items =
            sqlx::query_as::<_, ContentItem>("SELECT * FROM content_items ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(items.iter().map(ContentPreview::from).collect())
    }

    /// Capability flags of every plan the viewer holds an ACTIVE subscription to
    async fn unlocked_accesses(&self, viewer_id: Uuid) -> Result<Vec<ContentAccess>, ContentError> {
        let rows: Vec<Json<ContentAccess>> = sqlx::query_scalar(
            "SELECT p.content_access FROM subscriptions s \
             JOIN subscription_plans p ON p.id = s.plan_id \
             WHERE s.subscriber_id = $1 AND s.status = 'ACTIVE'",
        )
        .bind(viewer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|Json(access)| access).collect())
    }

    async fn has_purchased(&self, viewer_id: Uuid, content_id: Uuid) -> Result<bool, ContentError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM purchases WHERE buyer_id = $1 AND content_id = $2)",
        )
        .bind(viewer_id)
        .bind(content_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
