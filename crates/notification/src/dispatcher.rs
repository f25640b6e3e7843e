use std::sync::Arc;

use arbe_events_event::Event;
use arbe_events_registration::{Registration, RegistrationObserver};
use arbe_events_shared::Settings;

use crate::{Mail, Mailer, Placeholders};

/// Sends the admin notification and the registrant confirmation after each
/// accepted registration.
#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    settings: Arc<Settings>,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, settings: Arc<Settings>) -> Self {
        Self { mailer, settings }
    }

    fn mail(&self, to: &str, subject: String, body: String) -> Mail {
        Mail {
            from_name: self.settings.email_from_name.to_owned(),
            from_address: self.settings.email_from_address.to_owned(),
            to: to.to_owned(),
            subject,
            body,
        }
    }

    pub fn admin_mail(&self, placeholders: &Placeholders) -> Option<Mail> {
        if !self.settings.enable_notifications || self.settings.admin_email.trim().is_empty() {
            return None;
        }

        let templates = &self.settings.templates;

        Some(self.mail(
            self.settings.admin_email.trim(),
            placeholders.render(&templates.admin_notification_subject),
            placeholders.render(&templates.admin_notification_body),
        ))
    }

    pub fn user_mail(
        &self,
        registration: &Registration,
        placeholders: &Placeholders,
    ) -> Option<Mail> {
        if !self.settings.enable_user_confirmation {
            return None;
        }

        let templates = &self.settings.templates;

        Some(self.mail(
            &registration.email,
            placeholders.render(&templates.user_confirmation_subject),
            placeholders.render(&templates.user_confirmation_body),
        ))
    }
}

#[async_trait::async_trait]
impl RegistrationObserver for Dispatcher {
    fn name(&self) -> &'static str {
        "notification-dispatcher"
    }

    #[tracing::instrument(skip_all, fields(registration_id = registration.id))]
    async fn on_registered(
        &self,
        registration: &Registration,
        event: &Event,
    ) -> anyhow::Result<()> {
        let placeholders = Placeholders::new(registration, event, &self.settings);
        let mails = [
            ("admin", self.admin_mail(&placeholders)),
            ("user", self.user_mail(registration, &placeholders)),
        ];

        let mut failed = 0;
        for (kind, mail) in mails {
            let Some(mail) = mail else {
                continue;
            };

            if let Err(err) = self.mailer.send(mail).await {
                failed += 1;
                tracing::error!(kind, err = %err, "failed to send notification email");
            }
        }

        if failed > 0 {
            anyhow::bail!("{failed} notification email(s) failed");
        }

        Ok(())
    }
}
