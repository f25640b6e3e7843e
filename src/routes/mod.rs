use std::sync::Arc;

use arbe_events_shared::Settings;
use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;

use crate::config::Config;

mod admin;
mod capacity;
mod health;
mod register;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub settings: Arc<Settings>,
    pub registration_command: arbe_events_registration::Command,
    pub event_command: arbe_events_event::Command,
    pub event_query: arbe_events_event::Query,
    pub pool: SqlitePool,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route(
            "/events/{id}/register",
            get(register::page).post(register::action),
        )
        .route("/events/{id}/capacity", get(capacity::probe))
        .route("/admin/registrations", get(admin::registrations::list))
        .route(
            "/admin/registrations/counts",
            get(admin::registrations::counts),
        )
        .route("/admin/registrations/export", get(admin::export::download))
        .route("/admin/registrations/bulk", post(admin::registrations::bulk))
        .route(
            "/admin/registrations/{id}",
            get(admin::registrations::detail).delete(admin::registrations::delete),
        )
        .route(
            "/admin/registrations/{id}/status",
            post(admin::registrations::status),
        )
        .route(
            "/admin/events",
            get(admin::events::list).post(admin::events::create),
        )
        .route(
            "/admin/events/{id}",
            get(admin::events::detail)
                .put(admin::events::update)
                .delete(admin::events::delete),
        )
        .route("/admin/settings", get(admin::settings::show))
        .with_state(app_state)
}
