//! Centralized content-access gate.
//!
//! Every content-serving endpoint routes its visibility decision through
//! [`evaluate`]; the rule set exists exactly once.

use uuid::Uuid;

use crate::database::models::content::ContentItem;
use crate::database::models::plan::ContentAccess;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Viewer sees the complete item, media URL included
    Full,
    /// Viewer sees preview metadata and the creator's plans
    Preview,
}

impl AccessDecision {
    pub fn is_full(self) -> bool {
        matches!(self, AccessDecision::Full)
    }
}

/// Decide whether a viewer gets full access to a content item.
///
/// Full access is granted when any of the following holds, checked in order:
/// the viewer created the item; the item is not premium; one of the viewer's
/// active subscriptions carries a plan whose capability flags cover the
/// item's kind; the viewer purchased this specific item.
pub fn evaluate(
    viewer_id: Uuid,
    content: &ContentItem,
    unlocked: &[ContentAccess],
    has_purchased: bool,
) -> AccessDecision {
    if content.creator_id == viewer_id {
        return AccessDecision::Full;
    }

    if !content.is_premium {
        return AccessDecision::Full;
    }

    if unlocked.iter().any(|access| access.allows(content.kind)) {
        return AccessDecision::Full;
    }

    if has_purchased {
        return AccessDecision::Full;
    }

    AccessDecision::Preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::content::ContentKind;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn item(creator_id: Uuid, kind: ContentKind, is_premium: bool) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            creator_id,
            title: "Test item".to_string(),
            description: None,
            kind,
            is_premium,
            price: Some(dec!(4.99)),
            media_url: "https://cdn.example.com/media/1".to_string(),
            thumbnail_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn access_for(kind: ContentKind) -> ContentAccess {
        let mut access = ContentAccess::none();
        match kind {
            ContentKind::Regular => access.regular_content = true,
            ContentKind::PremiumVideo => access.premium_videos = true,
            ContentKind::Vr => access.vr_content = true,
            ContentKind::ThreeSixty => access.three_sixty_content = true,
            ContentKind::LiveRoom => access.live_rooms = true,
            ContentKind::InteractiveModel => access.interactive_models = true,
        }
        access
    }

    #[test]
    fn owner_always_gets_full_access() {
        let creator = Uuid::new_v4();
        let content = item(creator, ContentKind::Vr, true);
        assert!(evaluate(creator, &content, &[], false).is_full());
    }

    #[test]
    fn non_premium_content_is_open() {
        let content = item(Uuid::new_v4(), ContentKind::Regular, false);
        assert!(evaluate(Uuid::new_v4(), &content, &[], false).is_full());
    }

    #[test]
    fn covering_plan_unlocks_premium_content() {
        let content = item(Uuid::new_v4(), ContentKind::PremiumVideo, true);
        let unlocked = [access_for(ContentKind::PremiumVideo)];
        assert!(evaluate(Uuid::new_v4(), &content, &unlocked, false).is_full());
    }

    #[test]
    fn non_covering_plan_stays_paywalled() {
        let content = item(Uuid::new_v4(), ContentKind::Vr, true);
        let unlocked = [access_for(ContentKind::Regular)];
        assert_eq!(
            evaluate(Uuid::new_v4(), &content, &unlocked, false),
            AccessDecision::Preview
        );
    }

    #[test]
    fn any_of_several_plans_suffices() {
        let content = item(Uuid::new_v4(), ContentKind::LiveRoom, true);
        let unlocked = [
            access_for(ContentKind::Regular),
            access_for(ContentKind::LiveRoom),
        ];
        assert!(evaluate(Uuid::new_v4(), &content, &unlocked, false).is_full());
    }

    #[test]
    fn purchase_unlocks_the_item() {
        let content = item(Uuid::new_v4(), ContentKind::InteractiveModel, true);
        assert!(evaluate(Uuid::new_v4(), &content, &[], true).is_full());
    }

    #[test]
    fn no_grounds_means_preview() {
        let content = item(Uuid::new_v4(), ContentKind::ThreeSixty, true);
        assert_eq!(
            evaluate(Uuid::new_v4(), &content, &[], false),
            AccessDecision::Preview
        );
    }
}
