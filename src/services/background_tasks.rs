// Background task scheduler.
// Owns the subscription-expiry reconciliation: `expired` is written here
// on a fixed interval, never derived at read time.

use chrono::Utc;
use tracing::{error, info};

use crate::app::AppState;
use crate::services::subscription::SubscriptionService;

/// Background task manager
pub struct BackgroundTaskManager {
    state: AppState,
}

impl BackgroundTaskManager {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Start all background tasks
    pub fn start_all_tasks(&self) {
        let interval_secs = self
            .state
            .config
            .subscription_reconcile_interval_secs
            .max(60);
        info!(
            "Starting subscription reconciliation task (every {}s)",
            interval_secs
        );

        let state = self.state.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            loop {
                ticker.tick().await;
                run_reconciliation(&state).await;
            }
        });
    }
}

async fn run_reconciliation(state: &AppState) {
    let mut conn = match state.diesel_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Reconciliation skipped, no database connection: {}", e);
            return;
        },
    };

    let today = Utc::now().date_naive();
    match SubscriptionService::reconcile_expired(&mut conn, today).await {
        Ok((subs, companies)) => {
            if subs > 0 || companies > 0 {
                info!(
                    "Reconciliation expired {} subscriptions, {} companies",
                    subs, companies
                );
            }
        },
        Err(e) => error!("Subscription reconciliation failed: {}", e),
    }
}

/// Initialize background tasks (call this in main.rs)
pub fn initialize_background_tasks(state: AppState) {
    let task_manager = BackgroundTaskManager::new(state);
    task_manager.start_all_tasks();
}
