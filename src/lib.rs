use std::sync::Arc;

use arbe_events_notification::{Dispatcher, Mailer};
use arbe_events_registration::SqliteStore;
use sqlx::SqlitePool;
use sqlx_migrator::{Migrate, Plan};

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod routes;
pub mod scheduler;
pub mod security;
pub mod template;

pub use config::Config;
pub use routes::{AppState, router};

/// Applies every pending migration.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut conn = pool.acquire().await?;
    arbe_events_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}

/// Wires the admission engine, its notification observer and the event commands.
pub fn app_state(config: Config, pool: SqlitePool, mailer: Arc<dyn Mailer>) -> AppState {
    let settings = Arc::new(config.site.clone());
    let events = Arc::new(arbe_events_event::Query(pool.clone()));

    let registration_command = arbe_events_registration::Command::new(
        Arc::new(SqliteStore(pool.clone())),
        events,
    )
    .observer(Arc::new(Dispatcher::new(mailer, settings.clone())));

    AppState {
        event_command: arbe_events_event::Command::new(pool.clone(), settings.default_capacity),
        event_query: arbe_events_event::Query(pool.clone()),
        config: Arc::new(config),
        settings,
        registration_command,
        pool,
    }
}
