use arbe_events_registration::{CsvExporter, ListFilter, Registration};
use arbe_events_shared::{format_timestamp, now};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{parse_status, registrations::events_for};
use crate::{auth::AuthAdmin, error::AppError, routes::AppState};

pub const EMPTY_EXPORT_MESSAGE: &str = "No registrations to export.";

/// `registrations-{slug}-YYYY-MM-DD.csv` for one event, else a timestamped name.
pub fn filename(event_slug: Option<&str>, timestamp: i64) -> anyhow::Result<String> {
    let name = match event_slug {
        Some(slug) => format!(
            "registrations-{slug}-{}.csv",
            format_timestamp(timestamp, "[year]-[month]-[day]")?
        ),
        None => format!(
            "event-registrations-{}.csv",
            format_timestamp(timestamp, "[year]-[month]-[day]-[hour][minute][second]")?
        ),
    };

    Ok(name)
}

pub async fn csv_response(
    app: &AppState,
    registrations: Vec<Registration>,
    event_slug: Option<String>,
) -> Result<Response, AppError> {
    if registrations.is_empty() {
        return Err(AppError::NotFound(EMPTY_EXPORT_MESSAGE.to_owned()));
    }

    let events = events_for(app, &registrations).await?;
    let body = CsvExporter::new(&app.settings, &events).write(&registrations)?;
    let filename = filename(event_slug.as_deref(), now())?;

    tracing::info!(rows = registrations.len(), filename = %filename, "registrations exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct ExportQuery {
    pub status: Option<String>,
    pub event_id: Option<i64>,
    pub registration_id: Option<i64>,
}

/// GET /admin/registrations/export
pub async fn download(
    _admin: AuthAdmin,
    State(app): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    if let Some(id) = query.registration_id {
        let registrations = app.registration_command.find(id).await?.into_iter().collect();

        return csv_response(&app, registrations, None).await;
    }

    let page = app
        .registration_command
        .list_all(ListFilter {
            status: parse_status(query.status.as_deref())?,
            event_id: query.event_id,
            ..Default::default()
        })
        .await?;

    let event_slug = match query.event_id {
        Some(event_id) => app
            .registration_command
            .events()
            .find(event_id)
            .await?
            .map(|event| event.slug()),
        None => None,
    };

    csv_response(&app, page.items, event_slug).await
}
