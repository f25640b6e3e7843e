use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use arbe_events::Config;
use arbe_events_notification::{EmailService, Reminders};
use arbe_events_registration::SqliteStore;
use tower_http::trace::TraceLayer;

pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting arbe-events server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let pool =
        arbe_events::db::create_pool(&config.database.url, config.database.max_connections)
            .await?;
    arbe_events::migrate(&pool).await?;

    let mailer = Arc::new(EmailService::new(&config.email)?);
    let scheduler_config = config.scheduler.clone();
    let state = arbe_events::app_state(config, pool.clone(), mailer.clone());

    let mut scheduler = if scheduler_config.enabled {
        let reminders = Arc::new(Reminders::new(
            Arc::new(SqliteStore(pool.clone())),
            Arc::new(arbe_events_event::Query(pool.clone())),
            mailer,
            state.settings.clone(),
        ));

        let scheduler = arbe_events::scheduler::scheduler(&scheduler_config, reminders).await?;
        scheduler.start().await?;
        tracing::info!(cron = %scheduler_config.reminder_cron, "Reminder scheduler started");

        Some(scheduler)
    } else {
        tracing::info!("Reminder scheduler disabled");
        None
    };

    let app = arbe_events::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler.as_mut() {
        tracing::info!("Shutting down reminder scheduler...");

        if let Err(e) = scheduler.shutdown().await {
            tracing::error!("{e}");
        }
    }

    tracing::info!("Closing database pool...");
    pool.close().await;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
