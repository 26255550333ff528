use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::content::ContentKind;

/// The six capability flags a plan grants. All six are required on the wire;
/// a missing flag is a validation failure, never a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContentAccess {
    pub regular_content: bool,
    pub premium_videos: bool,
    pub vr_content: bool,
    pub three_sixty_content: bool,
    pub live_rooms: bool,
    pub interactive_models: bool,
}

impl ContentAccess {
    /// Does this plan unlock content of the given kind?
    pub fn allows(&self, kind: ContentKind) -> bool {
        match kind {
            ContentKind::Regular => self.regular_content,
            ContentKind::PremiumVideo => self.premium_videos,
            ContentKind::Vr => self.vr_content,
            ContentKind::ThreeSixty => self.three_sixty_content,
            ContentKind::LiveRoom => self.live_rooms,
            ContentKind::InteractiveModel => self.interactive_models,
        }
    }

    pub fn none() -> Self {
        Self {
            regular_content: false,
            premium_videos: false,
            vr_content: false,
            three_sixty_content: false,
            live_rooms: false,
            interactive_models: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub interval_in_days: i32,
    pub is_active: bool,
    pub content_access: Json<ContentAccess>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_maps_each_kind_to_its_flag() {
        let access = ContentAccess {
            regular_content: true,
            premium_videos: false,
            vr_content: true,
            three_sixty_content: false,
            live_rooms: false,
            interactive_models: true,
        };

        assert!(access.allows(ContentKind::Regular));
        assert!(!access.allows(ContentKind::PremiumVideo));
        assert!(access.allows(ContentKind::Vr));
        assert!(!access.allows(ContentKind::ThreeSixty));
        assert!(!access.allows(ContentKind::LiveRoom));
        assert!(access.allows(ContentKind::InteractiveModel));
    }

    #[test]
    fn content_access_requires_all_six_flags() {
        let missing_one = serde_json::json!({
            "regularContent": true,
            "premiumVideos": false,
            "vrContent": false,
            "threeSixtyContent": false,
            "liveRooms": false
        });
        assert!(serde_json::from_value::<ContentAccess>(missing_one).is_err());

        let complete = serde_json::json!({
            "regularContent": true,
            "premiumVideos": false,
            "vrContent": false,
            "threeSixtyContent": false,
            "liveRooms": false,
            "interactiveModels": false
        });
        let access: ContentAccess = serde_json::from_value(complete).unwrap();
        assert!(access.regular_content);
    }
}
