use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::content::ContentItem;
use crate::database::models::purchase::Purchase;
use crate::database::Database;

#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    #[error("Content not found")]
    ContentNotFound,
    #[error("Content has no purchase price")]
    NotPurchasable,
    #[error("Content already purchased")]
    AlreadyPurchased,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for PurchaseError {
    fn from(err: sqlx::Error) -> Self {
        // Unique (buyer_id, content_id) pair; a violation is a double purchase
        if let sqlx::Error::Database(ref db) = err {
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                return PurchaseError::AlreadyPurchased;
            }
        }
        PurchaseError::Database(DatabaseError::Sqlx(err))
    }
}

pub struct PurchaseService {
    pool: PgPool,
}

impl PurchaseService {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Record a one-off purchase at the item's current price
    pub async fn purchase(
        &self,
        buyer_id: Uuid,
        content_id: Uuid,
    ) -> Result<Purchase, PurchaseError> {
        let item = sqlx::query_as::<_, ContentItem>("SELECT * FROM content_items WHERE id = $1")
            .bind(content_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PurchaseError::ContentNotFound)?;

        let price = item.price.ok_or(PurchaseError::NotPurchasable)?;

        let purchase = sqlx::query_as::<_, Purchase>(
            "INSERT INTO purchases (buyer_id, content_id, price) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(buyer_id)
        .bind(content_id)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("User {} purchased content {}", buyer_id, content_id);
        Ok(purchase)
    }

    /// The caller's purchases, newest first
    pub async fn list_for_buyer(&self, buyer_id: Uuid) -> Result<Vec<Purchase>, PurchaseError> {
        let purchases = sqlx::query_as::<_, Purchase>(
            "SELECT * FROM purchases WHERE buyer_id = $1 ORDER BY purchased_at DESC",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }
}
