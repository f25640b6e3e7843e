use arbe_events_db::table::AeEvent;
use arbe_events_shared::{Error, Result, now, parse_date, parse_time};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::{Validate, ValidationError};

fn validate_date(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() || parse_date(value).is_some() {
        return Ok(());
    }

    Err(ValidationError::new("date").with_message("Dates must use YYYY-MM-DD.".into()))
}

fn validate_time(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() || parse_time(value).is_some() {
        return Ok(());
    }

    Err(ValidationError::new("time").with_message("Times must use HH:MM.".into()))
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EventInput {
    #[validate(length(min = 1, max = 255, message = "Title is required."))]
    pub title: String,
    #[validate(custom(function = "validate_date"))]
    pub start_date: Option<String>,
    #[validate(custom(function = "validate_time"))]
    pub start_time: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub end_date: Option<String>,
    #[validate(custom(function = "validate_time"))]
    pub end_time: Option<String>,
    #[validate(length(max = 255))]
    pub venue: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 20))]
    pub zip: Option<String>,
    #[validate(length(max = 2048))]
    pub virtual_url: Option<String>,
    /// `None` falls back to the site default capacity on create.
    pub capacity: Option<u32>,
    #[serde(default)]
    pub waitlist_enabled: bool,
    #[serde(default = "default_true")]
    pub registration_enabled: bool,
    pub registration_close_at: Option<i64>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Admin-side event management.
#[derive(Clone)]
pub struct Command {
    pool: SqlitePool,
    default_capacity: u32,
}

impl Command {
    pub fn new(pool: SqlitePool, default_capacity: u32) -> Self {
        Self {
            pool,
            default_capacity,
        }
    }

    #[tracing::instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: EventInput) -> Result<i64> {
        input.validate()?;

        let statement = Query::insert()
            .into_table(AeEvent::Table)
            .columns([
                AeEvent::Title,
                AeEvent::StartDate,
                AeEvent::StartTime,
                AeEvent::EndDate,
                AeEvent::EndTime,
                AeEvent::Venue,
                AeEvent::Address,
                AeEvent::City,
                AeEvent::State,
                AeEvent::Zip,
                AeEvent::VirtualUrl,
                AeEvent::Capacity,
                AeEvent::WaitlistEnabled,
                AeEvent::RegistrationEnabled,
                AeEvent::RegistrationCloseAt,
                AeEvent::CreatedAt,
            ])
            .values_panic([
                input.title.trim().to_owned().into(),
                clean(input.start_date).into(),
                clean(input.start_time).into(),
                clean(input.end_date).into(),
                clean(input.end_time).into(),
                clean(input.venue).into(),
                clean(input.address).into(),
                clean(input.city).into(),
                clean(input.state).into(),
                clean(input.zip).into(),
                clean(input.virtual_url).into(),
                input.capacity.unwrap_or(self.default_capacity).into(),
                input.waitlist_enabled.into(),
                input.registration_enabled.into(),
                input.registration_close_at.into(),
                now().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let id = sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::info!(event_id = id, "event created");

        Ok(id)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: EventInput) -> Result<()> {
        input.validate()?;

        let mut statement = Query::update()
            .table(AeEvent::Table)
            .values([
                (AeEvent::Title, input.title.trim().to_owned().into()),
                (AeEvent::StartDate, clean(input.start_date).into()),
                (AeEvent::StartTime, clean(input.start_time).into()),
                (AeEvent::EndDate, clean(input.end_date).into()),
                (AeEvent::EndTime, clean(input.end_time).into()),
                (AeEvent::Venue, clean(input.venue).into()),
                (AeEvent::Address, clean(input.address).into()),
                (AeEvent::City, clean(input.city).into()),
                (AeEvent::State, clean(input.state).into()),
                (AeEvent::Zip, clean(input.zip).into()),
                (AeEvent::VirtualUrl, clean(input.virtual_url).into()),
                (AeEvent::WaitlistEnabled, input.waitlist_enabled.into()),
                (
                    AeEvent::RegistrationEnabled,
                    input.registration_enabled.into(),
                ),
                (
                    AeEvent::RegistrationCloseAt,
                    input.registration_close_at.into(),
                ),
            ])
            .and_where(Expr::col(AeEvent::Id).eq(id))
            .to_owned();

        if let Some(capacity) = input.capacity {
            statement.value(AeEvent::Capacity, capacity);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("event {id}")));
        }

        Ok(())
    }

    /// Removes the event. Its registrations are kept and export with empty event columns.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let statement = Query::delete()
            .from_table(AeEvent::Table)
            .and_where(Expr::col(AeEvent::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("event {id}")));
        }

        Ok(())
    }
}
