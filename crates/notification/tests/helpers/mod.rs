use std::{
    path::PathBuf,
    str::FromStr,
    sync::{Arc, Mutex},
};

use arbe_events_notification::{Mail, Mailer};
use arbe_events_registration::{Command, SqliteStore};
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

/// Records every mail; fails for recipients listed in `reject`.
#[derive(Default)]
pub struct CapturingMailer {
    pub sent: Mutex<Vec<Mail>>,
    pub reject: Vec<String>,
}

impl CapturingMailer {
    #[allow(dead_code)]
    pub fn rejecting(to: &str) -> Self {
        Self {
            reject: vec![to.to_owned()],
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        if self.reject.contains(&mail.to) {
            anyhow::bail!("550 mailbox unavailable");
        }

        self.sent.lock().unwrap().push(mail);

        Ok(())
    }
}

pub fn command(pool: &SqlitePool) -> Command {
    Command::new(
        Arc::new(SqliteStore(pool.clone())),
        Arc::new(arbe_events_event::Query(pool.clone())),
    )
}

pub async fn create_event(
    pool: &SqlitePool,
    title: &str,
    start_date: &str,
) -> anyhow::Result<i64> {
    Ok(arbe_events_event::Command::new(pool.clone(), 0)
        .create(arbe_events_event::EventInput {
            title: title.to_owned(),
            start_date: Some(start_date.to_owned()),
            start_time: Some("09:15".to_owned()),
            venue: Some("Library".to_owned()),
            registration_enabled: true,
            ..Default::default()
        })
        .await?)
}
