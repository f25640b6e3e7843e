use arbe_events_db::table::AeEvent;
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::Event;

/// Read access to events, as needed by admission and notifications.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    async fn find(&self, id: i64) -> anyhow::Result<Option<Event>>;

    async fn find_many(&self, ids: &[i64]) -> anyhow::Result<Vec<Event>>;

    /// Events whose `start_date` equals `date` (`YYYY-MM-DD`).
    async fn starting_on(&self, date: &str) -> anyhow::Result<Vec<Event>>;
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

fn select() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            AeEvent::Id,
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
        .from(AeEvent::Table)
        .to_owned()
}

impl Query {
    pub async fn list(&self) -> anyhow::Result<Vec<Event>> {
        let statement = select()
            .order_by(AeEvent::StartDate, Order::Desc)
            .order_by(AeEvent::Id, Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Event, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }
}

#[async_trait::async_trait]
impl EventSource for Query {
    async fn find(&self, id: i64) -> anyhow::Result<Option<Event>> {
        let statement = select()
            .and_where(Expr::col(AeEvent::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Event, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    async fn find_many(&self, ids: &[i64]) -> anyhow::Result<Vec<Event>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(Expr::col(AeEvent::Id).is_in(ids.iter().copied()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Event, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn starting_on(&self, date: &str) -> anyhow::Result<Vec<Event>> {
        let statement = select()
            .and_where(Expr::col(AeEvent::StartDate).eq(date))
            .order_by(AeEvent::StartTime, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Event, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }
}
