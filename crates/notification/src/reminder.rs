use std::sync::Arc;

use arbe_events_event::EventSource;
use arbe_events_registration::{EventFilter, Order, OrderBy, RegistrationStore, Status};
use arbe_events_shared::Settings;

use crate::{Mail, Mailer, Placeholders};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReminderReport {
    pub events: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Reminder emails for confirmed registrants of upcoming events.
#[derive(Clone)]
pub struct Reminders {
    store: Arc<dyn RegistrationStore>,
    events: Arc<dyn EventSource>,
    mailer: Arc<dyn Mailer>,
    settings: Arc<Settings>,
}

impl Reminders {
    pub fn new(
        store: Arc<dyn RegistrationStore>,
        events: Arc<dyn EventSource>,
        mailer: Arc<dyn Mailer>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            store,
            events,
            mailer,
            settings,
        }
    }

    /// Sends the reminder template for every event starting on `date` (`YYYY-MM-DD`).
    #[tracing::instrument(skip(self))]
    pub async fn send_for(&self, date: &str) -> anyhow::Result<ReminderReport> {
        let mut report = ReminderReport::default();

        if !self.settings.enable_reminders {
            tracing::debug!("reminders disabled");
            return Ok(report);
        }

        let templates = &self.settings.templates;

        for event in self.events.starting_on(date).await? {
            report.events += 1;

            let registrations = self
                .store
                .list_by_event(
                    event.id,
                    EventFilter {
                        status: Some(Status::Confirmed),
                        order_by: OrderBy::RegistrationDate,
                        order: Order::Asc,
                        ..Default::default()
                    },
                )
                .await?;

            for registration in registrations {
                let placeholders = Placeholders::new(&registration, &event, &self.settings);
                let mail = Mail {
                    from_name: self.settings.email_from_name.to_owned(),
                    from_address: self.settings.email_from_address.to_owned(),
                    to: registration.email.to_owned(),
                    subject: placeholders.render(&templates.reminder_subject),
                    body: placeholders.render(&templates.reminder_body),
                };

                match self.mailer.send(mail).await {
                    Ok(_) => report.sent += 1,
                    Err(err) => {
                        report.failed += 1;
                        tracing::error!(
                            registration_id = registration.id,
                            err = %err,
                            "failed to send reminder"
                        );
                    }
                }
            }
        }

        tracing::info!(
            events = report.events,
            sent = report.sent,
            failed = report.failed,
            "reminders sent"
        );

        Ok(report)
    }
}
