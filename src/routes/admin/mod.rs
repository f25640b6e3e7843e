use arbe_events_event::Event;
use arbe_events_registration::{Registration, Status};
use arbe_events_shared::Metadata;
use serde::Serialize;

pub mod events;
pub mod export;
pub mod registrations;
pub mod settings;

/// Registration as exposed by the admin API.
#[derive(Debug, Serialize)]
pub struct RegistrationView {
    pub id: i64,
    pub event_id: i64,
    pub event_title: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: Status,
    pub status_label: &'static str,
    pub registration_date: i64,
    pub meta: Metadata,
}

impl RegistrationView {
    pub fn new(registration: Registration, event: Option<&Event>) -> Self {
        let status = registration.status();

        Self {
            id: registration.id,
            event_id: registration.event_id,
            event_title: event.map(|e| e.title.to_owned()),
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
            status,
            status_label: status.label(),
            registration_date: registration.registration_date,
            meta: registration.meta.0,
        }
    }
}

/// `None` for an empty value or `all`.
pub fn parse_status(value: Option<&str>) -> Result<Option<Status>, crate::error::AppError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty() && *v != "all") else {
        return Ok(None);
    };

    value
        .parse::<Status>()
        .map(Some)
        .map_err(|_| crate::error::AppError::ValidationError(format!("Invalid status `{value}`.")))
}
