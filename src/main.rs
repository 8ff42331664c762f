use std::net::SocketAddr;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vms_backend_core::services::initialize_background_tasks;
use vms_backend_core::{build_router, db::mask_connection_string, initialize_app_state};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vms_backend_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = vms_backend_core::app_config::config();
    info!(
        "Starting VMS backend on {} (database: {})",
        config.bind_address,
        mask_connection_string(&config.database_url)
    );

    let state = match initialize_app_state().await {
        Ok(state) => {
            info!("Application state initialized successfully");
            state
        },
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(std::io::Error::other(format!(
                "Initialization failed: {}",
                e
            )));
        },
    };

    // Subscription expiry reconciliation runs in the background
    initialize_background_tasks(state.clone());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Listening on {}", config.bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
