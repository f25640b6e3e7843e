use arbe_events_event::EventInput;
use arbe_events_shared::Error;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{auth::AuthAdmin, error::AppError, routes::AppState};

/// GET /admin/events
pub async fn list(
    _admin: AuthAdmin,
    State(app): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app.event_query.list().await?))
}

/// POST /admin/events
pub async fn create(
    admin: AuthAdmin,
    State(app): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = app.event_command.create(input).await?;

    tracing::info!(id, by = %admin.subject, "event created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "id": id } })),
    ))
}

/// GET /admin/events/{id}
pub async fn detail(
    _admin: AuthAdmin,
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
) -> Result<impl IntoResponse, AppError> {
    let Some(event) = app.registration_command.events().find(id).await? else {
        return Err(Error::NotFound(format!("event {id}")).into());
    };

    Ok(Json(event))
}

/// PUT /admin/events/{id}
pub async fn update(
    _admin: AuthAdmin,
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
    Json(input): Json<EventInput>,
) -> Result<impl IntoResponse, AppError> {
    app.event_command.update(id, input).await?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// DELETE /admin/events/{id}
pub async fn delete(
    admin: AuthAdmin,
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
) -> Result<impl IntoResponse, AppError> {
    app.event_command.delete(id).await?;

    tracing::info!(id, by = %admin.subject, "event deleted");

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}
