use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Content categories, each gated by one plan capability flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentKind {
    Regular,
    PremiumVideo,
    Vr,
    ThreeSixty,
    LiveRoom,
    InteractiveModel,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub kind: ContentKind,
    pub is_premium: bool,
    /// One-off purchase price; None means subscription-only
    pub price: Option<Decimal>,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a paywalled viewer is allowed to see: metadata only, no media URL
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPreview {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub kind: ContentKind,
    pub is_premium: bool,
    pub price: Option<Decimal>,
    pub thumbnail_url: Option<String>,
}

impl From<&ContentItem> for ContentPreview {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id,
            creator_id: item.creator_id,
            title: item.title.clone(),
            kind: item.kind,
            is_premium: item.is_premium,
            price: item.price,
            thumbnail_url: item.thumbnail_url.clone(),
        }
    }
}
