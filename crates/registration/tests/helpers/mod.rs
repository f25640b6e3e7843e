use std::{collections::HashMap, path::PathBuf, str::FromStr, sync::Arc};

use arbe_events_event::EventInput;
use arbe_events_registration::{
    Admission, Command, EventFilter, ListFilter, NewRegistration, Page, Registration,
    RegistrationStore, SqliteStore, Status, SubmitInput,
};
use arbe_events_shared::Metadata;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    arbe_events_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(pool)
}

#[allow(dead_code)]
pub fn command(pool: &SqlitePool) -> Command {
    Command::new(
        Arc::new(SqliteStore(pool.clone())),
        Arc::new(arbe_events_event::Query(pool.clone())),
    )
}

#[allow(dead_code)]
pub async fn create_event(
    pool: &SqlitePool,
    capacity: u32,
    waitlist_enabled: bool,
) -> anyhow::Result<i64> {
    create_event_with(
        pool,
        EventInput {
            capacity: Some(capacity),
            waitlist_enabled,
            ..event_input("Community meetup")
        },
    )
    .await
}

#[allow(dead_code)]
pub async fn create_event_with(pool: &SqlitePool, input: EventInput) -> anyhow::Result<i64> {
    Ok(arbe_events_event::Command::new(pool.clone(), 100)
        .create(input)
        .await?)
}

#[allow(dead_code)]
pub fn event_input(title: &str) -> EventInput {
    EventInput {
        title: title.to_owned(),
        start_date: Some("2025-09-12".to_owned()),
        start_time: Some("19:00".to_owned()),
        venue: Some("Maison du Peuple".to_owned()),
        city: Some("Brussels".to_owned()),
        registration_enabled: true,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn input(event_id: i64, name: &str) -> SubmitInput {
    SubmitInput {
        event_id,
        name: name.to_owned(),
        email: format!("{}@arbe-events.localhost", name.to_lowercase()),
        phone: None,
    }
}

#[allow(dead_code)]
pub async fn submit(command: &Command, event_id: i64, name: &str) -> anyhow::Result<Admission> {
    Ok(command
        .submit(input(event_id, name), Metadata::default())
        .await?)
}

#[allow(dead_code)]
pub async fn submit_all(
    command: &Command,
    event_id: i64,
    names: impl IntoIterator<Item = impl AsRef<str>>,
) -> anyhow::Result<Vec<Admission>> {
    let mut admissions = vec![];
    for name in names.into_iter() {
        admissions.push(submit(command, event_id, name.as_ref()).await?);
    }

    Ok(admissions)
}

#[allow(dead_code)]
pub fn accepted_id(admission: &Admission) -> i64 {
    match admission {
        Admission::Accepted { id, .. } => *id,
        Admission::Rejected(rejection) => panic!("expected acceptance, got {rejection:?}"),
    }
}

/// Store whose inserts always fail.
#[allow(dead_code)]
pub struct FailingStore(pub SqliteStore);

#[async_trait::async_trait]
impl RegistrationStore for FailingStore {
    async fn insert(&self, _input: NewRegistration) -> anyhow::Result<i64> {
        anyhow::bail!("disk I/O error")
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Registration>> {
        self.0.get(id).await
    }

    async fn get_many(&self, ids: &[i64]) -> anyhow::Result<Vec<Registration>> {
        self.0.get_many(ids).await
    }

    async fn list_by_event(
        &self,
        event_id: i64,
        filter: EventFilter,
    ) -> anyhow::Result<Vec<Registration>> {
        self.0.list_by_event(event_id, filter).await
    }

    async fn list_all(&self, filter: ListFilter) -> anyhow::Result<Page<Registration>> {
        self.0.list_all(filter).await
    }

    async fn count_by_event(&self, event_id: i64, status: Option<Status>) -> anyhow::Result<u64> {
        self.0.count_by_event(event_id, status).await
    }

    async fn count_by_status(&self, event_id: Option<i64>) -> anyhow::Result<HashMap<Status, u64>> {
        self.0.count_by_status(event_id).await
    }

    async fn update_status(&self, id: i64, status: Status) -> anyhow::Result<bool> {
        self.0.update_status(id, status).await
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.0.delete(id).await
    }

    async fn is_email_registered(&self, event_id: i64, email: &str) -> anyhow::Result<bool> {
        self.0.is_email_registered(event_id, email).await
    }
}
