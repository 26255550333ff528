// Plan behavior that depends on real Postgres state: ownership checks,
// the delete guard, and the order errors surface in on updates.

use std::time::Duration;

use axum::extract::{Extension, Path, State};
use axum::Json;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use fanhub_api::database::models::plan::ContentAccess;
use fanhub_api::database::models::user::Role;
use fanhub_api::database::Database;
use fanhub_api::handlers::protected::plans::{self, UpdatePlanRequest};
use fanhub_api::middleware::AuthUser;
use fanhub_api::services::plan_service::{NewPlan, PlanChanges, PlanError, PlanService};
use fanhub_api::services::subscription_service::SubscriptionService;
use fanhub_api::state::AppState;

async fn seed_user(pool: &PgPool, role: Role) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, display_name, role) \
         VALUES ($1, 'not-a-real-hash', 'Fixture user', $2) RETURNING id",
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn gold_tier() -> NewPlan {
    NewPlan {
        name: "Gold tier".to_string(),
        price: dec!(9.99),
        description: None,
        features: vec!["Behind the scenes".to_string()],
        interval_in_days: 30,
        is_active: true,
        content_access: ContentAccess {
            regular_content: true,
            ..ContentAccess::none()
        },
    }
}

fn creator_auth(id: Uuid) -> AuthUser {
    AuthUser {
        id,
        email: format!("{}@example.com", id),
        role: Role::Creator,
    }
}

#[sqlx::test]
async fn delete_is_refused_while_a_subscription_is_active(pool: PgPool) {
    let db = Database::from_pool(pool.clone());
    let creator = seed_user(&pool, Role::Creator).await;
    let subscriber = seed_user(&pool, Role::Subscriber).await;

    let plans = PlanService::new(&db);
    let plan = plans.create(creator, gold_tier()).await.unwrap();

    let subscriptions = SubscriptionService::new(&db);
    let subscription = subscriptions.subscribe(subscriber, plan.id).await.unwrap();

    let err = plans.delete(creator, plan.id).await.unwrap_err();
    assert!(matches!(err, PlanError::ActiveSubscriptions));
    assert!(plans.get(plan.id).await.is_ok(), "plan must survive");

    // Once the subscription is cancelled the delete goes through.
    subscriptions
        .cancel(subscriber, subscription.id)
        .await
        .unwrap();
    plans.delete(creator, plan.id).await.unwrap();
    assert!(matches!(plans.get(plan.id).await, Err(PlanError::NotFound)));
}

#[sqlx::test]
async fn mutations_by_a_non_owner_are_refused(pool: PgPool) {
    let db = Database::from_pool(pool.clone());
    let owner = seed_user(&pool, Role::Creator).await;
    let intruder = seed_user(&pool, Role::Creator).await;

    let plans = PlanService::new(&db);
    let plan = plans.create(owner, gold_tier()).await.unwrap();

    let changes = PlanChanges {
        price: Some(dec!(1)),
        ..PlanChanges::default()
    };
    assert!(matches!(
        plans.update(intruder, plan.id, changes).await,
        Err(PlanError::NotOwner)
    ));
    assert!(matches!(
        plans.delete(intruder, plan.id).await,
        Err(PlanError::NotOwner)
    ));

    // An absent plan reads as missing, even to a would-be owner.
    assert!(matches!(
        plans.update(owner, Uuid::new_v4(), PlanChanges::default()).await,
        Err(PlanError::NotFound)
    ));
}

#[sqlx::test]
async fn update_reports_ownership_before_payload_problems(pool: PgPool) {
    let db = Database::from_pool(pool.clone());
    let owner = seed_user(&pool, Role::Creator).await;
    let intruder = seed_user(&pool, Role::Creator).await;

    let plan = PlanService::new(&db).create(owner, gold_tier()).await.unwrap();
    let state = AppState { db };

    // A zero price fails validation, but a non-owner must see 403 no
    // matter what the body contains.
    let invalid = UpdatePlanRequest {
        price: Some(Decimal::ZERO),
        ..UpdatePlanRequest::default()
    };
    let err = plans::update(
        State(state.clone()),
        Extension(creator_auth(intruder)),
        Path(plan.id),
        Ok(Json(invalid)),
    )
    .await
    .err()
    .expect("non-owner update must fail");
    assert_eq!(err.status_code(), 403);

    // And an absent plan is a 404, again ahead of validation.
    let invalid = UpdatePlanRequest {
        price: Some(Decimal::ZERO),
        ..UpdatePlanRequest::default()
    };
    let err = plans::update(
        State(state),
        Extension(creator_auth(owner)),
        Path(Uuid::new_v4()),
        Ok(Json(invalid)),
    )
    .await
    .err()
    .expect("update of a missing plan must fail");
    assert_eq!(err.status_code(), 404);
}

// No live database here on purpose: the handler must reach for the plan
// row first, so with an unreachable pool an invalid payload surfaces the
// lookup failure instead of a validation error.
#[tokio::test]
async fn update_consults_the_database_before_validating() {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy("postgres://127.0.0.1:1/unreachable")
        .unwrap();
    let state = AppState {
        db: Database::from_pool(pool),
    };

    let invalid = UpdatePlanRequest {
        price: Some(Decimal::ZERO),
        ..UpdatePlanRequest::default()
    };
    let err = plans::update(
        State(state),
        Extension(creator_auth(Uuid::new_v4())),
        Path(Uuid::new_v4()),
        Ok(Json(invalid)),
    )
    .await
    .err()
    .expect("update against an unreachable database must fail");

    assert_eq!(err.status_code(), 500);
}
