use std::collections::HashMap;

use arbe_events_event::Event;
use arbe_events_shared::{Settings, format_date, format_time, format_timestamp};

use crate::Registration;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADERS: [&str; 10] = [
    "ID",
    "Event",
    "Name",
    "Email",
    "Phone",
    "Status",
    "Registration Date",
    "Event Date",
    "Event Time",
    "Location",
];

/// Renders registrations as a UTF-8 CSV document prefixed with a byte-order mark.
pub struct CsvExporter<'a> {
    settings: &'a Settings,
    events: HashMap<i64, &'a Event>,
}

impl<'a> CsvExporter<'a> {
    pub fn new(settings: &'a Settings, events: &'a [Event]) -> Self {
        Self {
            settings,
            events: events.iter().map(|e| (e.id, e)).collect(),
        }
    }

    fn row(&self, registration: &Registration) -> anyhow::Result<[String; 10]> {
        let registration_date = format_timestamp(
            registration.registration_date,
            &format!("{} {}", self.settings.date_format, self.settings.time_format),
        )?;

        let (title, date, time, location) = match self.events.get(&registration.event_id) {
            Some(event) => (
                event.title.to_owned(),
                format_date(
                    event.start_date.as_deref().unwrap_or_default(),
                    &self.settings.date_format,
                ),
                format_time(
                    event.start_time.as_deref().unwrap_or_default(),
                    &self.settings.time_format,
                ),
                event.location(),
            ),
            None => Default::default(),
        };

        Ok([
            registration.id.to_string(),
            title,
            registration.name.to_owned(),
            registration.email.to_owned(),
            registration.phone.to_owned(),
            registration.status().label().to_owned(),
            registration_date,
            date,
            time,
            location,
        ])
    }

    pub fn write(&self, registrations: &[Registration]) -> anyhow::Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(BOM.to_vec());
        writer.write_record(CSV_HEADERS)?;

        for registration in registrations {
            writer.write_record(self.row(registration)?)?;
        }

        Ok(writer.into_inner().map_err(|e| e.into_error())?)
    }
}
