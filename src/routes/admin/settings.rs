use arbe_events_shared::settings::schema;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::{auth::AuthAdmin, routes::AppState};

/// GET /admin/settings
pub async fn show(_admin: AuthAdmin, State(app): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "schema": schema(),
        "values": app.settings.values(),
    }))
}
