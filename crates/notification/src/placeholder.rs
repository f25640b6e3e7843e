use arbe_events_event::Event;
use arbe_events_registration::Registration;
use arbe_events_shared::{Settings, format_date, format_time, format_timestamp};

/// Values substituted into email templates, keyed by placeholder name.
#[derive(Debug, Clone, Default)]
pub struct Placeholders(Vec<(&'static str, String)>);

impl Placeholders {
    pub fn new(registration: &Registration, event: &Event, settings: &Settings) -> Self {
        let registration_date = format_timestamp(
            registration.registration_date,
            &format!("{} {}", settings.date_format, settings.time_format),
        )
        .unwrap_or_else(|err| {
            tracing::warn!(err = %err, "failed to format registration date");
            String::new()
        });

        Self(vec![
            ("name", registration.name.to_owned()),
            ("email", registration.email.to_owned()),
            ("phone", registration.phone.to_owned()),
            ("event_title", event.title.to_owned()),
            (
                "event_date",
                format_date(
                    event.start_date.as_deref().unwrap_or_default(),
                    &settings.date_format,
                ),
            ),
            (
                "event_time",
                format_time(
                    event.start_time.as_deref().unwrap_or_default(),
                    &settings.time_format,
                ),
            ),
            ("event_location", event.location()),
            ("registration_date", registration_date),
            ("site_name", settings.site_name.to_owned()),
            ("site_url", settings.site_url.to_owned()),
        ])
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every known `{key}` in one pass. Unknown braces are left as is.
    pub fn render(&self, template: &str) -> String {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            output.push_str(&rest[..start]);
            let tail = &rest[start + 1..];

            let value = tail
                .find('}')
                .and_then(|end| self.get(&tail[..end]).map(|value| (end, value)));

            match value {
                Some((end, value)) => {
                    output.push_str(value);
                    rest = &tail[end + 1..];
                }
                None => {
                    output.push('{');
                    rest = tail;
                }
            }
        }

        output.push_str(rest);
        output
    }
}

#[cfg(test)]
mod tests {
    use arbe_events_shared::Metadata;

    use super::*;

    fn registration() -> Registration {
        Registration {
            id: 1,
            event_id: 2,
            name: "Ada {email}".to_owned(),
            email: "ada@arbe-events.localhost".to_owned(),
            phone: String::new(),
            status: sqlx::types::Text(arbe_events_registration::Status::Confirmed),
            // 2025-03-07 18:30:00 UTC
            registration_date: 1_741_372_200,
            meta: sqlx::types::Json(Metadata::default()),
        }
    }

    #[test]
    fn test_render() {
        let event = Event {
            title: "Spring gala".to_owned(),
            start_date: Some("2025-04-01".to_owned()),
            venue: Some("Opera".to_owned()),
            ..Default::default()
        };
        let settings = Settings {
            site_name: "Arbe".to_owned(),
            ..Default::default()
        };
        let placeholders = Placeholders::new(&registration(), &event, &settings);

        assert_eq!(
            placeholders.render("{name} / {event_title} on {event_date} at {event_time}."),
            "Ada {email} / Spring gala on April 1, 2025 at ."
        );
        assert_eq!(
            placeholders.render("{registration_date} @ {event_location} {site_name}"),
            "March 7, 2025 6:30 pm @ Opera Arbe"
        );
        assert_eq!(
            placeholders.render("{unknown} {phone}{ {name"),
            "{unknown} { {name"
        );
    }
}
