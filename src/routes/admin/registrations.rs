use std::collections::HashMap;

use arbe_events_event::Event;
use arbe_events_registration::{BulkAction, ListFilter, Order, OrderBy, Registration, Status};
use arbe_events_shared::Error;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use strum::VariantArray;

use super::{RegistrationView, export, parse_status};
use crate::{auth::AuthAdmin, error::AppError, routes::AppState};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 200;

/// Looks up the events referenced by `registrations`.
pub async fn events_for(
    app: &AppState,
    registrations: &[Registration],
) -> Result<Vec<Event>, AppError> {
    let mut ids = registrations.iter().map(|r| r.event_id).collect::<Vec<_>>();
    ids.sort_unstable();
    ids.dedup();

    Ok(app.registration_command.events().find_many(&ids).await?)
}

fn views(registrations: Vec<Registration>, events: &[Event]) -> Vec<RegistrationView> {
    let events = events.iter().map(|e| (e.id, e)).collect::<HashMap<_, _>>();

    registrations
        .into_iter()
        .map(|r| {
            let event = events.get(&r.event_id).copied();
            RegistrationView::new(r, event)
        })
        .collect()
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub event_id: Option<i64>,
    pub orderby: Option<String>,
    pub order: Option<String>,
    pub per_page: Option<u64>,
    pub paged: Option<u64>,
}

impl ListQuery {
    fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    fn page(&self) -> u64 {
        self.paged.unwrap_or(1).max(1)
    }

    fn filter(&self) -> Result<ListFilter, AppError> {
        let per_page = self.per_page();
        let offset = (self.page() - 1)
            .checked_mul(per_page)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::ValidationError("Invalid page number.".to_owned()))?;

        Ok(ListFilter {
            status: parse_status(self.status.as_deref())?,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            event_id: self.event_id,
            // Unknown columns and directions fall back to the defaults
            order_by: self
                .orderby
                .as_deref()
                .and_then(|v| v.parse::<OrderBy>().ok())
                .unwrap_or_default(),
            order: self
                .order
                .as_deref()
                .and_then(|v| v.parse::<Order>().ok())
                .unwrap_or_default(),
            limit: Some(per_page),
            offset,
        })
    }
}

/// GET /admin/registrations
pub async fn list(
    _admin: AuthAdmin,
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = app.registration_command.list_all(query.filter()?).await?;
    let events = events_for(&app, &page.items).await?;
    let per_page = query.per_page();

    Ok(Json(json!({
        "items": views(page.items, &events),
        "total": page.total,
        "per_page": per_page,
        "page": query.page(),
        "total_pages": page.total.div_ceil(per_page),
    })))
}

#[derive(Deserialize)]
pub struct CountsQuery {
    pub event_id: Option<i64>,
}

/// GET /admin/registrations/counts
pub async fn counts(
    _admin: AuthAdmin,
    State(app): State<AppState>,
    Query(query): Query<CountsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let counts = app
        .registration_command
        .count_by_status(query.event_id)
        .await?;

    // Scoped to one event, "all" leaves out cancelled registrations
    let all = counts
        .iter()
        .filter(|(status, _)| query.event_id.is_none() || **status != Status::Cancelled)
        .map(|(_, count)| count)
        .sum::<u64>();

    let mut body = serde_json::Map::new();
    body.insert("all".to_owned(), all.into());
    for status in Status::VARIANTS {
        let count = counts.get(status).copied().unwrap_or_default();
        body.insert(status.to_string(), count.into());
    }

    Ok(Json(body))
}

/// GET /admin/registrations/{id}
pub async fn detail(
    _admin: AuthAdmin,
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
) -> Result<impl IntoResponse, AppError> {
    let Some(registration) = app.registration_command.find(id).await? else {
        return Err(Error::NotFound(format!("registration {id}")).into());
    };

    let event = app
        .registration_command
        .events()
        .find(registration.event_id)
        .await?;

    Ok(Json(RegistrationView::new(registration, event.as_ref())))
}

#[derive(Deserialize)]
pub struct StatusInput {
    pub status: Status,
}

/// POST /admin/registrations/{id}/status
pub async fn status(
    admin: AuthAdmin,
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
    Json(input): Json<StatusInput>,
) -> Result<impl IntoResponse, AppError> {
    app.registration_command
        .change_status(id, input.status)
        .await?;

    tracing::info!(
        id,
        status = %input.status,
        by = %admin.subject,
        "registration status changed"
    );

    Ok(Json(json!({
        "success": true,
        "data": {
            "id": id,
            "status": input.status,
            "status_label": input.status.label(),
        },
    })))
}

/// DELETE /admin/registrations/{id}
pub async fn delete(
    admin: AuthAdmin,
    State(app): State<AppState>,
    Path((id,)): Path<(i64,)>,
) -> Result<impl IntoResponse, AppError> {
    app.registration_command.delete(id).await?;

    tracing::info!(id, by = %admin.subject, "registration deleted");

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

#[derive(Deserialize)]
pub struct BulkInput {
    pub action: BulkAction,
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// POST /admin/registrations/bulk
pub async fn bulk(
    _admin: AuthAdmin,
    State(app): State<AppState>,
    Json(input): Json<BulkInput>,
) -> Result<Response, AppError> {
    if input.ids.is_empty() {
        return Err(AppError::ValidationError(
            "No registrations selected.".to_owned(),
        ));
    }

    let mut report = app
        .registration_command
        .bulk(input.action, &input.ids)
        .await?;

    if input.action == BulkAction::Export {
        let registrations = std::mem::take(&mut report.registrations);
        return export::csv_response(&app, registrations, None).await;
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "message": input.action.message(),
            "report": report,
        },
    }))
    .into_response())
}
