use std::{collections::HashMap, sync::Arc};

use arbe_events_event::{Event, EventSource};
use arbe_events_shared::{Error, Metadata, Result, now};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    EventFilter, EventLocks, ListFilter, NewRegistration, Page, Registration, RegistrationStore,
    Status,
};

fn validate_name(value: &str) -> std::result::Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message("Name is required.".into()));
    }

    if value.chars().count() > 255 {
        return Err(ValidationError::new("length")
            .with_message("Name must be 255 characters or fewer.".into()));
    }

    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitInput {
    pub event_id: i64,
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(
        email(message = "Valid email is required."),
        length(max = 100, message = "Email must be 100 characters or fewer.")
    )]
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be 20 characters or fewer."))]
    pub phone: Option<String>,
}

impl SubmitInput {
    /// Trims every field, lower-cases the email and drops an empty phone.
    pub fn normalized(self) -> Self {
        Self {
            event_id: self.event_id,
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_lowercase(),
            phone: self
                .phone
                .map(|p| p.trim().to_owned())
                .filter(|p| !p.is_empty()),
        }
    }

    fn messages(&self) -> Vec<String> {
        let Err(errors) = self.validate() else {
            return vec![];
        };

        let fields = errors.field_errors();
        let mut messages = vec![];
        for field in ["name", "email", "phone"] {
            let Some(errors) = fields.get(field) else {
                continue;
            };

            for error in errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}."));

                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
        }

        messages
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("{}", .0.join(" "))]
    Validation(Vec<String>),
    #[error("Registration for this event is closed.")]
    RegistrationClosed,
    #[error("You have already registered for this event.")]
    Duplicate,
    #[error("Sorry, this event is full.")]
    CapacityFull,
    #[error("Failed to save registration. Please try again.")]
    Persistence,
}

impl Rejection {
    /// Value of the `error` query parameter on synchronous redirects.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::Validation(_) => "invalid",
            Rejection::RegistrationClosed => "closed",
            Rejection::Duplicate => "duplicate",
            Rejection::CapacityFull => "full",
            Rejection::Persistence => "error",
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Accepted { id: i64, status: Status },
    Rejected(Rejection),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted { .. })
    }
}

/// Called after a registration has been persisted.
#[async_trait::async_trait]
pub trait RegistrationObserver: Send + Sync {
    fn name(&self) -> &'static str;

    async fn on_registered(&self, registration: &Registration, event: &Event)
    -> anyhow::Result<()>;
}

/// Serialized as `"unlimited"` or a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpotsRemaining {
    Unlimited,
    Count(u64),
}

impl Serialize for SpotsRemaining {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SpotsRemaining::Unlimited => serializer.serialize_str("unlimited"),
            SpotsRemaining::Count(count) => serializer.serialize_u64(*count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityProbe {
    pub available: bool,
    pub spots_remaining: SpotsRemaining,
    pub waitlist_enabled: bool,
    pub capacity: u32,
    pub registered: u64,
}

#[derive(Clone)]
pub struct Command {
    store: Arc<dyn RegistrationStore>,
    events: Arc<dyn EventSource>,
    locks: EventLocks,
    observers: Vec<Arc<dyn RegistrationObserver>>,
}

impl Command {
    pub fn new(store: Arc<dyn RegistrationStore>, events: Arc<dyn EventSource>) -> Self {
        Self {
            store,
            events,
            locks: EventLocks::default(),
            observers: vec![],
        }
    }

    /// Observers run in registration order.
    pub fn observer(mut self, observer: Arc<dyn RegistrationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn store(&self) -> &Arc<dyn RegistrationStore> {
        &self.store
    }

    pub fn events(&self) -> &Arc<dyn EventSource> {
        &self.events
    }

    #[tracing::instrument(skip_all, fields(event_id = input.event_id))]
    pub async fn submit(&self, input: SubmitInput, metadata: Metadata) -> Result<Admission> {
        let input = input.normalized();
        let mut messages = input.messages();

        let event = if input.event_id > 0 {
            self.events.find(input.event_id).await?
        } else {
            None
        };

        let Some(event) = event else {
            messages.push("Invalid event.".to_owned());
            return Ok(Admission::Rejected(Rejection::Validation(messages)));
        };

        if !messages.is_empty() {
            return Ok(Admission::Rejected(Rejection::Validation(messages)));
        }

        if !event.is_open(now()) {
            return Ok(Admission::Rejected(Rejection::RegistrationClosed));
        }

        let guard = self.locks.acquire(event.id).await;

        if self
            .store
            .is_email_registered(event.id, &input.email)
            .await?
        {
            return Ok(Admission::Rejected(Rejection::Duplicate));
        }

        let status = if event.is_unlimited() {
            Status::Confirmed
        } else {
            let confirmed = self
                .store
                .count_by_event(event.id, Some(Status::Confirmed))
                .await?;

            if confirmed < u64::from(event.capacity) {
                Status::Confirmed
            } else if event.waitlist_enabled {
                Status::Waitlist
            } else {
                return Ok(Admission::Rejected(Rejection::CapacityFull));
            }
        };

        let id = match self
            .store
            .insert(NewRegistration {
                event_id: event.id,
                name: input.name,
                email: input.email,
                phone: input.phone.unwrap_or_default(),
                status,
                registration_date: None,
                meta: metadata,
            })
            .await
        {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(err = %err, "failed to persist registration");
                return Ok(Admission::Rejected(Rejection::Persistence));
            }
        };

        drop(guard);

        tracing::info!(registration_id = id, status = %status, "registration accepted");

        self.notify(id, &event).await;

        Ok(Admission::Accepted { id, status })
    }

    async fn notify(&self, id: i64, event: &Event) {
        if self.observers.is_empty() {
            return;
        }

        let registration = match self.store.get(id).await {
            Ok(Some(registration)) => registration,
            Ok(None) => {
                tracing::warn!(registration_id = id, "registration vanished before observers ran");
                return;
            }
            Err(err) => {
                tracing::warn!(registration_id = id, err = %err, "failed to reload registration");
                return;
            }
        };

        for observer in self.observers.iter() {
            if let Err(err) = observer.on_registered(&registration, event).await {
                tracing::warn!(
                    observer = observer.name(),
                    registration_id = id,
                    err = %err,
                    "registration observer failed"
                );
            }
        }
    }

    /// Overwrites the status without re-checking capacity.
    #[tracing::instrument(skip(self))]
    pub async fn change_status(&self, id: i64, status: Status) -> Result<()> {
        if !self.store.update_status(id, status).await? {
            return Err(Error::NotFound(format!("registration {id}")));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(Error::NotFound(format!("registration {id}")));
        }

        Ok(())
    }

    pub async fn capacity(&self, event_id: i64) -> Result<CapacityProbe> {
        let Some(event) = self.events.find(event_id).await? else {
            return Err(Error::NotFound(format!("event {event_id}")));
        };

        let registered = self
            .store
            .count_by_event(event.id, Some(Status::Confirmed))
            .await?;

        if event.is_unlimited() {
            return Ok(CapacityProbe {
                available: true,
                spots_remaining: SpotsRemaining::Unlimited,
                waitlist_enabled: event.waitlist_enabled,
                capacity: 0,
                registered,
            });
        }

        let remaining = u64::from(event.capacity).saturating_sub(registered);

        Ok(CapacityProbe {
            available: remaining > 0,
            spots_remaining: SpotsRemaining::Count(remaining),
            waitlist_enabled: event.waitlist_enabled,
            capacity: event.capacity,
            registered,
        })
    }

    pub async fn find(&self, id: i64) -> Result<Option<Registration>> {
        Ok(self.store.get(id).await?)
    }

    pub async fn list_all(&self, filter: ListFilter) -> Result<Page<Registration>> {
        Ok(self.store.list_all(filter).await?)
    }

    pub async fn list_by_event(
        &self,
        event_id: i64,
        filter: EventFilter,
    ) -> Result<Vec<Registration>> {
        Ok(self.store.list_by_event(event_id, filter).await?)
    }

    pub async fn count_by_event(&self, event_id: i64, status: Option<Status>) -> Result<u64> {
        Ok(self.store.count_by_event(event_id, status).await?)
    }

    pub async fn count_by_status(&self, event_id: Option<i64>) -> Result<HashMap<Status, u64>> {
        Ok(self.store.count_by_status(event_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_in_field_order() {
        let input = SubmitInput {
            event_id: 1,
            name: "  ".to_owned(),
            email: " Not-An-Email ".to_owned(),
            phone: Some("0".repeat(21)),
        }
        .normalized();

        assert_eq!(
            input.messages(),
            vec![
                "Name is required.".to_owned(),
                "Valid email is required.".to_owned(),
                "Phone must be 20 characters or fewer.".to_owned(),
            ]
        );
    }

    #[test]
    fn test_normalized() {
        let input = SubmitInput {
            event_id: 3,
            name: " Ada ".to_owned(),
            email: " Ada@Example.COM ".to_owned(),
            phone: Some("   ".to_owned()),
        }
        .normalized();

        assert_eq!(input.name, "Ada");
        assert_eq!(input.email, "ada@example.com");
        assert_eq!(input.phone, None);
        assert!(input.messages().is_empty());
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(Rejection::Validation(vec![]).code(), "invalid");
        assert_eq!(Rejection::CapacityFull.code(), "full");
        assert_eq!(
            Rejection::Validation(vec!["Name is required.".into(), "Invalid event.".into()])
                .message(),
            "Name is required. Invalid event."
        );
    }

    #[test]
    fn test_spots_remaining_json() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_string(&SpotsRemaining::Unlimited)?,
            "\"unlimited\""
        );
        assert_eq!(serde_json::to_string(&SpotsRemaining::Count(3))?, "3");

        Ok(())
    }
}
