// Library exports for the VMS backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, CONFIG};
pub use config::{AdminRole, Permission, Role};
pub use db::{DieselPool, MIGRATIONS};
pub use middleware::{AuthenticatedAdmin, AuthenticatedUser};
pub use models::auth::{AccessTokenClaims, AdminTokenClaims};
pub use services::{
    EmailService, JwtConfig, JwtError, JwtService, RazorpayClient, SubscriptionService,
    VerificationService,
};

use std::sync::Arc;
use tracing::info;

/// Initialize application state: configuration, database pool, migrations,
/// and shared services
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    // Load environment
    dotenv::dotenv().ok();

    // Initialize config
    let config = app_config::config();

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run migrations if enabled
    if migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        let migration_config = migrations::MigrationConfig::default();
        migrations::run_all_migrations(&diesel_pool, migration_config)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    // Initialize services
    let jwt_service = Arc::new(JwtService::from_env());
    let email_service = Arc::new(EmailService::new(config.email.clone())?);
    let razorpay_client = Arc::new(RazorpayClient::new(config.razorpay.clone()));

    Ok(AppState {
        config: Arc::new(config.clone()),
        diesel_pool,
        jwt_service,
        email_service,
        razorpay_client,
        max_connections,
    })
}

/// Build the full application router: tenant API, admin portal, health
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::get;

    let api = handlers::public_routes()
        .merge(handlers::tenant_routes(state.clone()))
        .nest("/admin", handlers::admin_routes(state.clone()));

    axum::Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(axum::middleware::from_fn(
            middleware::dynamic_cors_middleware,
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let mut overall_healthy = true;
    let timestamp = chrono::Utc::now().to_rfc3339();

    let postgres_health = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => serde_json::json!({
            "status": "healthy",
            "max_connections": state.max_connections,
            "error": null
        }),
        Err(e) => {
            overall_healthy = false;
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            })
        },
    };

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "vms-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health,
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
