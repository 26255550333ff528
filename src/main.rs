use axum::{
    extract::State,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use fanhub_api::config::{self, AppConfig, Environment};
use fanhub_api::database::Database;
use fanhub_api::handlers::{protected, public};
use fanhub_api::middleware::{jwt_auth_middleware, require_creator_middleware};
use fanhub_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::config();
    info!("Starting fanhub API in {:?} mode", config.environment);

    // Explicit pool lifecycle: open before serving, close after shutdown
    let db = Database::connect(&config.database).await?;
    let state = AppState { db: db.clone() };

    let app = app(state, config);

    // Allow deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("fanhub API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
    }
}

fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API behind JWT authentication
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    // Plan mutations and the owner listing require the creator role;
    // single-plan reads are open to every authenticated user.
    let creator_only = Router::new()
        .route(
            "/api/plans",
            get(protected::plans::list).post(protected::plans::create),
        )
        .route(
            "/api/plans/:id",
            put(protected::plans::update).delete(protected::plans::remove),
        )
        .route_layer(axum_middleware::from_fn(require_creator_middleware));

    Router::new()
        .merge(creator_only)
        .route("/api/plans/:id", get(protected::plans::get_one))
        .route("/api/auth/whoami", get(protected::auth::whoami))
        .route("/api/auth/promote", post(protected::auth::promote))
        .route("/api/content", get(protected::content::list))
        .route("/api/content/:id", get(protected::content::get_one))
        .route(
            "/api/subscriptions",
            get(protected::subscriptions::list).post(protected::subscriptions::create),
        )
        .route(
            "/api/subscriptions/:id",
            delete(protected::subscriptions::cancel),
        )
        .route(
            "/api/purchases",
            get(protected::purchases::list).post(protected::purchases::create),
        )
        .layer(axum_middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if matches!(config.environment, Environment::Development) {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "fanhub API",
            "version": version,
            "description": "Creator subscription platform backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "account": "/api/auth/whoami, /api/auth/promote (protected)",
                "plans": "/api/plans[/:id] (protected, mutations require creator role)",
                "content": "/api/content[/:id] (protected, gated by plan/purchase)",
                "subscriptions": "/api/subscriptions[/:id] (protected)",
                "purchases": "/api/purchases (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
