//! Site-wide registration settings.
//!
//! Settings are loaded once with the rest of the configuration and handed to
//! the components that need them. [`schema`] describes every key for UI layers.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use validator::ValidateEmail;

pub const DEFAULT_DATE_FORMAT: &str = "[month repr:long] [day padding:none], [year]";
pub const DEFAULT_TIME_FORMAT: &str = "[hour repr:12 padding:none]:[minute] [period case:lower]";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub admin_email: String,
    pub enable_notifications: bool,
    pub enable_user_confirmation: bool,
    pub enable_reminders: bool,
    pub default_capacity: u32,
    pub date_format: String,
    pub time_format: String,
    pub enable_recaptcha: bool,
    pub recaptcha_site_key: String,
    pub recaptcha_secret_key: String,
    pub form_success_message: String,
    pub form_waitlist_message: String,
    pub form_error_message: String,
    pub email_from_name: String,
    pub email_from_address: String,
    pub site_name: String,
    pub site_url: String,
    pub templates: EmailTemplates,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            admin_email: "admin@arbe-events.localhost".to_owned(),
            enable_notifications: true,
            enable_user_confirmation: true,
            enable_reminders: true,
            default_capacity: 100,
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            time_format: DEFAULT_TIME_FORMAT.to_owned(),
            enable_recaptcha: false,
            recaptcha_site_key: String::new(),
            recaptcha_secret_key: String::new(),
            form_success_message:
                "Thank you for registering! You will receive a confirmation email shortly."
                    .to_owned(),
            form_waitlist_message:
                "You have been added to the waitlist. We will notify you if a spot becomes available."
                    .to_owned(),
            form_error_message:
                "Sorry, there was an error processing your registration. Please try again."
                    .to_owned(),
            email_from_name: "Arbe Events".to_owned(),
            email_from_address: "noreply@arbe-events.localhost".to_owned(),
            site_name: "Arbe Events".to_owned(),
            site_url: "http://localhost:3000".to_owned(),
            templates: EmailTemplates::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmailTemplates {
    pub admin_notification_subject: String,
    pub admin_notification_body: String,
    pub user_confirmation_subject: String,
    pub user_confirmation_body: String,
    pub reminder_subject: String,
    pub reminder_body: String,
}

impl Default for EmailTemplates {
    fn default() -> Self {
        Self {
            admin_notification_subject: "New Event Registration".to_owned(),
            admin_notification_body: DEFAULT_ADMIN_BODY.to_owned(),
            user_confirmation_subject: "Registration Confirmation".to_owned(),
            user_confirmation_body: DEFAULT_USER_BODY.to_owned(),
            reminder_subject: "Event Reminder".to_owned(),
            reminder_body: DEFAULT_REMINDER_BODY.to_owned(),
        }
    }
}

const DEFAULT_ADMIN_BODY: &str = "A new registration has been received for your event.

Event: {event_title}
Name: {name}
Email: {email}
Phone: {phone}
Registration Date: {registration_date}

You can view all registrations in the admin panel.";

const DEFAULT_USER_BODY: &str = "Dear {name},

Thank you for registering for {event_title}.

Event Details:
Date: {event_date}
Time: {event_time}
Location: {event_location}

We look forward to seeing you at the event!

If you need to cancel your registration, please contact us.

Best regards,
{site_name}";

const DEFAULT_REMINDER_BODY: &str = "Dear {name},

This is a reminder that you're registered for {event_title} tomorrow.

Event Details:
Date: {event_date}
Time: {event_time}
Location: {event_location}

We look forward to seeing you!

Best regards,
{site_name}";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SettingKind {
    Email,
    Toggle,
    Integer,
    DateFormat,
    Text,
    Secret,
    Url,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingField {
    pub key: &'static str,
    pub kind: SettingKind,
    pub default: serde_json::Value,
    pub description: &'static str,
    #[serde(skip)]
    pub validator: fn(&serde_json::Value) -> bool,
}

impl SettingField {
    fn new(
        key: &'static str,
        kind: SettingKind,
        default: impl Into<serde_json::Value>,
        description: &'static str,
    ) -> Self {
        let validator: fn(&serde_json::Value) -> bool = match kind {
            SettingKind::Email => valid_email,
            SettingKind::Toggle => valid_toggle,
            SettingKind::Integer => valid_integer,
            SettingKind::DateFormat => valid_date_format,
            SettingKind::Url => valid_url,
            SettingKind::Text | SettingKind::Secret => valid_text,
        };

        Self {
            key,
            kind,
            default: default.into(),
            description,
            validator,
        }
    }

    pub fn validate(&self, value: &serde_json::Value) -> bool {
        (self.validator)(value)
    }
}

fn valid_email(value: &serde_json::Value) -> bool {
    value.as_str().is_some_and(|v| v.validate_email())
}

fn valid_toggle(value: &serde_json::Value) -> bool {
    value.is_boolean()
}

fn valid_integer(value: &serde_json::Value) -> bool {
    value.as_u64().is_some_and(|v| v <= u32::MAX as u64)
}

fn valid_date_format(value: &serde_json::Value) -> bool {
    value.as_str().is_some_and(crate::is_valid_format)
}

fn valid_url(value: &serde_json::Value) -> bool {
    value
        .as_str()
        .is_some_and(|v| v.starts_with("http://") || v.starts_with("https://"))
}

fn valid_text(value: &serde_json::Value) -> bool {
    value.is_string()
}

/// Every configurable key with its kind, default and validator.
pub fn schema() -> Vec<SettingField> {
    let defaults = Settings::default();
    let templates = defaults.templates.clone();

    vec![
        SettingField::new(
            "admin_email",
            SettingKind::Email,
            defaults.admin_email,
            "Recipient of new registration notifications",
        ),
        SettingField::new(
            "enable_notifications",
            SettingKind::Toggle,
            defaults.enable_notifications,
            "Send an email to the admin on each registration",
        ),
        SettingField::new(
            "enable_user_confirmation",
            SettingKind::Toggle,
            defaults.enable_user_confirmation,
            "Send a confirmation email to the registrant",
        ),
        SettingField::new(
            "enable_reminders",
            SettingKind::Toggle,
            defaults.enable_reminders,
            "Send reminder emails the day before an event",
        ),
        SettingField::new(
            "default_capacity",
            SettingKind::Integer,
            defaults.default_capacity,
            "Capacity given to new events, 0 means unlimited",
        ),
        SettingField::new(
            "date_format",
            SettingKind::DateFormat,
            defaults.date_format,
            "Date format description used in emails and exports",
        ),
        SettingField::new(
            "time_format",
            SettingKind::DateFormat,
            defaults.time_format,
            "Time format description used in emails and exports",
        ),
        SettingField::new(
            "enable_recaptcha",
            SettingKind::Toggle,
            defaults.enable_recaptcha,
            "Render the reCAPTCHA widget on the registration form",
        ),
        SettingField::new(
            "recaptcha_site_key",
            SettingKind::Text,
            defaults.recaptcha_site_key,
            "reCAPTCHA site key",
        ),
        SettingField::new(
            "recaptcha_secret_key",
            SettingKind::Secret,
            defaults.recaptcha_secret_key,
            "reCAPTCHA secret key",
        ),
        SettingField::new(
            "form_success_message",
            SettingKind::Text,
            defaults.form_success_message,
            "Message shown after a confirmed registration",
        ),
        SettingField::new(
            "form_waitlist_message",
            SettingKind::Text,
            defaults.form_waitlist_message,
            "Message shown after a waitlisted registration",
        ),
        SettingField::new(
            "form_error_message",
            SettingKind::Text,
            defaults.form_error_message,
            "Message shown when a registration could not be saved",
        ),
        SettingField::new(
            "email_from_name",
            SettingKind::Text,
            defaults.email_from_name,
            "Sender name of outgoing emails",
        ),
        SettingField::new(
            "email_from_address",
            SettingKind::Email,
            defaults.email_from_address,
            "Sender address of outgoing emails",
        ),
        SettingField::new(
            "site_name",
            SettingKind::Text,
            defaults.site_name,
            "Value of the {site_name} placeholder",
        ),
        SettingField::new(
            "site_url",
            SettingKind::Url,
            defaults.site_url,
            "Value of the {site_url} placeholder",
        ),
        SettingField::new(
            "templates.admin_notification_subject",
            SettingKind::Text,
            templates.admin_notification_subject,
            "Subject of the admin notification",
        ),
        SettingField::new(
            "templates.admin_notification_body",
            SettingKind::Text,
            templates.admin_notification_body,
            "Body of the admin notification",
        ),
        SettingField::new(
            "templates.user_confirmation_subject",
            SettingKind::Text,
            templates.user_confirmation_subject,
            "Subject of the registrant confirmation",
        ),
        SettingField::new(
            "templates.user_confirmation_body",
            SettingKind::Text,
            templates.user_confirmation_body,
            "Body of the registrant confirmation",
        ),
        SettingField::new(
            "templates.reminder_subject",
            SettingKind::Text,
            templates.reminder_subject,
            "Subject of the event reminder",
        ),
        SettingField::new(
            "templates.reminder_body",
            SettingKind::Text,
            templates.reminder_body,
            "Body of the event reminder",
        ),
    ]
}

impl Settings {
    /// Current values keyed like [`schema`], secrets redacted.
    pub fn values(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut values = serde_json::Map::new();
        let Ok(serde_json::Value::Object(root)) = serde_json::to_value(self) else {
            return values;
        };

        for field in schema() {
            let value = match field.key.split_once('.') {
                Some((section, key)) => root.get(section).and_then(|s| s.get(key)),
                None => root.get(field.key),
            };

            let value = match (field.kind, value) {
                (SettingKind::Secret, Some(serde_json::Value::String(s))) if !s.is_empty() => {
                    serde_json::Value::String("********".to_owned())
                }
                (_, Some(v)) => v.clone(),
                (_, None) => serde_json::Value::Null,
            };

            values.insert(field.key.to_owned(), value);
        }

        values
    }

    /// Runs every schema validator against the current values.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let Ok(serde_json::Value::Object(root)) = serde_json::to_value(self) else {
            return Err(vec!["settings are not serializable".to_owned()]);
        };

        let mut errors = vec![];
        for field in schema() {
            let value = match field.key.split_once('.') {
                Some((section, key)) => root.get(section).and_then(|s| s.get(key)),
                None => root.get(field.key),
            };

            if !value.is_some_and(|v| field.validate(v)) {
                errors.push(format!("invalid value for `{}` ({})", field.key, field.kind));
            }
        }

        if self.enable_recaptcha
            && (self.recaptcha_site_key.is_empty() || self.recaptcha_secret_key.is_empty())
        {
            errors.push("reCAPTCHA is enabled but its keys are missing".to_owned());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
