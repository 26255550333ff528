use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One-off purchase of a single content item, recorded at the price
/// the item carried at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub content_id: Uuid,
    pub price: Decimal,
    pub purchased_at: DateTime<Utc>,
}
