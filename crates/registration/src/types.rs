use arbe_events_shared::Metadata;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Confirmed,
    Waitlist,
    Cancelled,
    Pending,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Confirmed => "Confirmed",
            Status::Waitlist => "Waitlist",
            Status::Cancelled => "Cancelled",
            Status::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: sqlx::types::Text<Status>,
    pub registration_date: i64,
    pub meta: sqlx::types::Json<Metadata>,
}

impl Registration {
    pub fn status(&self) -> Status {
        self.status.0
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.0 == Status::Cancelled
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewRegistration {
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: Status,
    /// Defaults to now when `None`.
    pub registration_date: Option<i64>,
    pub meta: Metadata,
}
