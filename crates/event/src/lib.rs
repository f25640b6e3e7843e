mod command;
mod query;

pub use command::*;
pub use query::*;

use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Debug, Default, Clone, Serialize, FromRow, PartialEq)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub virtual_url: Option<String>,
    pub capacity: u32,
    pub waitlist_enabled: bool,
    pub registration_enabled: bool,
    pub registration_close_at: Option<i64>,
    pub created_at: i64,
}

impl Event {
    /// Venue, address, city, state and zip joined with `", "`, empty parts skipped.
    pub fn location(&self) -> String {
        [
            &self.venue,
            &self.address,
            &self.city,
            &self.state,
            &self.zip,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// `true` while the event accepts submissions at `now`.
    pub fn is_open(&self, now: i64) -> bool {
        self.registration_enabled && self.registration_close_at.is_none_or(|close| now < close)
    }

    pub fn is_unlimited(&self) -> bool {
        self.capacity == 0
    }

    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        for c in self.title.trim().chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }

        let slug = slug.trim_end_matches('-');
        if slug.is_empty() {
            format!("event-{}", self.id)
        } else {
            slug.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_skips_empty_parts() {
        let event = Event {
            venue: Some("Town Hall".to_owned()),
            address: Some("  ".to_owned()),
            city: Some("Lyon".to_owned()),
            zip: Some("69001".to_owned()),
            ..Default::default()
        };

        assert_eq!(event.location(), "Town Hall, Lyon, 69001");
        assert_eq!(Event::default().location(), "");
    }

    #[test]
    fn test_is_open() {
        let mut event = Event {
            registration_enabled: true,
            ..Default::default()
        };
        assert!(event.is_open(100));

        event.registration_close_at = Some(100);
        assert!(event.is_open(99));
        assert!(!event.is_open(100));

        event.registration_close_at = None;
        event.registration_enabled = false;
        assert!(!event.is_open(0));
    }

    #[test]
    fn test_slug() {
        let event = Event {
            id: 7,
            title: "Rust & Friends: Meetup #3!".to_owned(),
            ..Default::default()
        };
        assert_eq!(event.slug(), "rust-friends-meetup-3");

        let event = Event {
            id: 7,
            title: "???".to_owned(),
            ..Default::default()
        };
        assert_eq!(event.slug(), "event-7");
    }
}
