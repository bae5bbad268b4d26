use std::sync::Arc;

use goaltrack_core::{
    goals::{GoalService, GoalServiceTrait},
    store::TrackingStoreExecutor,
    users::{UserService, UserServiceTrait},
    utils::{Clock, SystemClock},
};
use goaltrack_storage_sqlite::{db, SqliteStoreExecutor};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub user_service: Arc<dyn UserServiceTrait>,
    /// Source of "today" for request validation; shared with the services.
    pub clock: Arc<dyn Clock>,
}

pub fn init_tracing() {
    let log_format = std::env::var("GT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_clock(config, Arc::new(SystemClock)).await
}

/// Same as [`build_state`] with an explicit clock.
pub async fn build_state_with_clock(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let executor: Arc<dyn TrackingStoreExecutor> =
        Arc::new(SqliteStoreExecutor::new(pool, writer));
    let goal_service = Arc::new(GoalService::new(executor.clone(), clock.clone()));
    let user_service = Arc::new(UserService::new(executor, clock.clone()));

    Ok(Arc::new(AppState {
        goal_service,
        user_service,
        clock,
    }))
}
