use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppError, routes::AppState};

/// GET /events/{id}/capacity
pub async fn probe(
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
) -> Result<impl IntoResponse, AppError> {
    let probe = app.registration_command.capacity(id).await?;

    Ok(Json(json!({ "success": true, "data": probe })))
}
