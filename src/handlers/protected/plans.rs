use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::database::models::plan::{ContentAccess, SubscriptionPlan};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::plan_service::{NewPlan, PlanChanges, PlanService};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, message = "Plan name must not be empty"))]
    pub name: String,
    #[validate(custom(function = positive_price))]
    pub price: Decimal,
    pub description: Option<String>,
    pub features: Vec<String>,
    #[validate(range(min = 1, message = "Billing interval must be at least one day"))]
    pub interval_in_days: i32,
    pub is_active: Option<bool>,
    pub content_access: ContentAccess,
}

/// Same rules as creation, every field optional
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, message = "Plan name must not be empty"))]
    pub name: Option<String>,
    #[validate(custom(function = positive_price))]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    #[validate(range(min = 1, message = "Billing interval must be at least one day"))]
    pub interval_in_days: Option<i32>,
    pub is_active: Option<bool>,
    pub content_access: Option<ContentAccess>,
}

fn positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        let mut error = ValidationError::new("positive_price");
        error.message = Some("Price must be greater than zero".into());
        Err(error)
    }
}

/// GET /api/plans - The authenticated creator's plans, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<SubscriptionPlan>> {
    let plans = PlanService::new(&state.db).list_for_creator(user.id).await?;
    Ok(ApiResponse::success(plans))
}

/// GET /api/plans/:id - Any authenticated user may read any plan
pub async fn get_one(
    State(state): State<AppState>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<SubscriptionPlan> {
    let plan = PlanService::new(&state.db).get(plan_id).await?;
    Ok(ApiResponse::success(plan))
}

/// POST /api/plans - Create a plan owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreatePlanRequest>, JsonRejection>,
) -> ApiResult<SubscriptionPlan> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    req.validate()?;

    let plan = PlanService::new(&state.db)
        .create(
            user.id,
            NewPlan {
                name: req.name,
                price: req.price,
                description: req.description,
                features: req.features,
                interval_in_days: req.interval_in_days,
                is_active: req.is_active.unwrap_or(true),
                content_access: req.content_access,
            },
        )
        .await?;

    Ok(ApiResponse::created(plan))
}

/// PUT /api/plans/:id - Partial update, owner only.
///
/// The plan is resolved and ownership checked before the payload is
/// validated, so a missing plan is a 404 and a foreign plan a 403 no
/// matter what the body contains.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(plan_id): Path<Uuid>,
    payload: Result<Json<UpdatePlanRequest>, JsonRejection>,
) -> ApiResult<SubscriptionPlan> {
    let Json(req) = payload.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let service = PlanService::new(&state.db);
    service.get_owned(user.id, plan_id).await?;
    req.validate()?;

    let plan = service
        .update(
            user.id,
            plan_id,
            PlanChanges {
                name: req.name,
                price: req.price,
                description: req.description,
                features: req.features,
                interval_in_days: req.interval_in_days,
                is_active: req.is_active,
                content_access: req.content_access,
            },
        )
        .await?;

    Ok(ApiResponse::success(plan))
}

/// DELETE /api/plans/:id - Owner only, refused while active subscriptions exist
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<()> {
    PlanService::new(&state.db).delete(user.id, plan_id).await?;
    Ok(ApiResponse::<()>::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_create_json() -> serde_json::Value {
        serde_json::json!({
            "name": "Gold tier",
            "price": "9.99",
            "features": ["Behind the scenes", "Monthly VR drop"],
            "intervalInDays": 30,
            "contentAccess": {
                "regularContent": true,
                "premiumVideos": false,
                "vrContent": false,
                "threeSixtyContent": false,
                "liveRooms": false,
                "interactiveModels": false
            }
        })
    }

    #[test]
    fn valid_payload_passes() {
        let req: CreatePlanRequest = serde_json::from_value(valid_create_json()).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.price, dec!(9.99));
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut body = valid_create_json();
        body["price"] = serde_json::json!("0");
        let req: CreatePlanRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut body = valid_create_json();
        body["price"] = serde_json::json!("-5.00");
        let req: CreatePlanRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut body = valid_create_json();
        body["intervalInDays"] = serde_json::json!(0);
        let req: CreatePlanRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("interval_in_days"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut body = valid_create_json();
        body["name"] = serde_json::json!("");
        let req: CreatePlanRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn missing_content_access_flag_fails_deserialization() {
        let mut body = valid_create_json();
        body["contentAccess"]
            .as_object_mut()
            .unwrap()
            .remove("liveRooms");
        assert!(serde_json::from_value::<CreatePlanRequest>(body).is_err());
    }

    #[test]
    fn update_accepts_sparse_payload() {
        let req: UpdatePlanRequest =
            serde_json::from_value(serde_json::json!({ "price": "5" })).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.price, Some(dec!(5)));
        assert!(req.name.is_none());
    }

    #[test]
    fn update_still_rejects_bad_values() {
        let req: UpdatePlanRequest =
            serde_json::from_value(serde_json::json!({ "price": "0", "intervalInDays": -3 }))
                .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
        assert!(errors.field_errors().contains_key("interval_in_days"));
    }
}
