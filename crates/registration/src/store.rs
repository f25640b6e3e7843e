use std::collections::HashMap;

use arbe_events_db::table::{AeEvent, AeRegistration};
use arbe_events_shared::now;
use sea_query::{
    Expr, ExprTrait, Func, LikeExpr, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::{EventFilter, ListFilter, NewRegistration, Order, OrderBy, Page, Registration, Status};

/// Persistence contract for registrations.
///
/// Implementations are passive: duplicate and capacity rules belong to the
/// admission engine.
#[async_trait::async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn insert(&self, input: NewRegistration) -> anyhow::Result<i64>;

    async fn get(&self, id: i64) -> anyhow::Result<Option<Registration>>;

    async fn get_many(&self, ids: &[i64]) -> anyhow::Result<Vec<Registration>>;

    async fn list_by_event(
        &self,
        event_id: i64,
        filter: EventFilter,
    ) -> anyhow::Result<Vec<Registration>>;

    async fn list_all(&self, filter: ListFilter) -> anyhow::Result<Page<Registration>>;

    /// `None` counts every status except cancelled.
    async fn count_by_event(&self, event_id: i64, status: Option<Status>) -> anyhow::Result<u64>;

    async fn count_by_status(&self, event_id: Option<i64>) -> anyhow::Result<HashMap<Status, u64>>;

    async fn update_status(&self, id: i64, status: Status) -> anyhow::Result<bool>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;

    /// `true` when a non-cancelled registration exists for the pair.
    async fn is_email_registered(&self, event_id: i64, email: &str) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct SqliteStore(pub SqlitePool);

const COLUMNS: [AeRegistration; 8] = [
    AeRegistration::Id,
    AeRegistration::EventId,
    AeRegistration::Name,
    AeRegistration::Email,
    AeRegistration::Phone,
    AeRegistration::Status,
    AeRegistration::RegistrationDate,
    AeRegistration::Meta,
];

fn select() -> SelectStatement {
    Query::select()
        .columns(COLUMNS.map(|c| (AeRegistration::Table, c)))
        .from(AeRegistration::Table)
        .to_owned()
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn apply_order(statement: &mut SelectStatement, order_by: OrderBy, order: Order) {
    let order = match order {
        Order::Asc => sea_query::Order::Asc,
        Order::Desc => sea_query::Order::Desc,
    };

    match order_by {
        OrderBy::RegistrationDate => {
            statement.order_by(
                (AeRegistration::Table, AeRegistration::RegistrationDate),
                order.clone(),
            );
        }
        OrderBy::Name => {
            statement.order_by((AeRegistration::Table, AeRegistration::Name), order.clone());
        }
        OrderBy::Email => {
            statement.order_by((AeRegistration::Table, AeRegistration::Email), order.clone());
        }
        OrderBy::Status => {
            statement.order_by((AeRegistration::Table, AeRegistration::Status), order.clone());
        }
        OrderBy::Event => {
            statement
                .left_join(
                    AeEvent::Table,
                    Expr::col((AeEvent::Table, AeEvent::Id))
                        .equals((AeRegistration::Table, AeRegistration::EventId)),
                )
                .order_by((AeEvent::Table, AeEvent::Title), order.clone());
        }
    }

    statement.order_by((AeRegistration::Table, AeRegistration::Id), order);
}

fn apply_list_filter(statement: &mut SelectStatement, filter: &ListFilter) {
    if let Some(status) = filter.status {
        statement.and_where(
            Expr::col((AeRegistration::Table, AeRegistration::Status)).eq(status.to_string()),
        );
    }

    if let Some(event_id) = filter.event_id {
        statement
            .and_where(Expr::col((AeRegistration::Table, AeRegistration::EventId)).eq(event_id));
    }

    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(search) = search {
        let pattern = escape_like(&search.to_lowercase());
        statement.cond_where(
            sea_query::Cond::any()
                .add(
                    Expr::col((AeRegistration::Table, AeRegistration::SearchName))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
                .add(
                    Expr::col((AeRegistration::Table, AeRegistration::Email))
                        .like(LikeExpr::new(pattern).escape('\\')),
                ),
        );
    }
}

impl SqliteStore {
    async fn count(&self, statement: SelectStatement) -> anyhow::Result<u64> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let total = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&self.0)
            .await?;

        Ok(u64::try_from(total)?)
    }
}

#[async_trait::async_trait]
impl RegistrationStore for SqliteStore {
    async fn insert(&self, input: NewRegistration) -> anyhow::Result<i64> {
        let meta = serde_json::to_string(&input.meta)?;
        let statement = Query::insert()
            .into_table(AeRegistration::Table)
            .columns([
                AeRegistration::EventId,
                AeRegistration::Name,
                AeRegistration::Email,
                AeRegistration::Phone,
                AeRegistration::Status,
                AeRegistration::RegistrationDate,
                AeRegistration::Meta,
                AeRegistration::SearchName,
            ])
            .values_panic([
                input.event_id.into(),
                input.name.to_owned().into(),
                input.email.into(),
                input.phone.into(),
                input.status.to_string().into(),
                input.registration_date.unwrap_or_else(now).into(),
                meta.into(),
                input.name.to_lowercase().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let id = sqlx::query_with(&sql, values)
            .execute(&self.0)
            .await?
            .last_insert_rowid();

        Ok(id)
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Registration>> {
        let statement = select()
            .and_where(Expr::col((AeRegistration::Table, AeRegistration::Id)).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Registration, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    async fn get_many(&self, ids: &[i64]) -> anyhow::Result<Vec<Registration>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(
                Expr::col((AeRegistration::Table, AeRegistration::Id)).is_in(ids.iter().copied()),
            )
            .order_by(
                (AeRegistration::Table, AeRegistration::Id),
                sea_query::Order::Asc,
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Registration, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn list_by_event(
        &self,
        event_id: i64,
        filter: EventFilter,
    ) -> anyhow::Result<Vec<Registration>> {
        let mut statement = select()
            .and_where(Expr::col((AeRegistration::Table, AeRegistration::EventId)).eq(event_id))
            .to_owned();

        if let Some(status) = filter.status {
            statement.and_where(
                Expr::col((AeRegistration::Table, AeRegistration::Status)).eq(status.to_string()),
            );
        }

        apply_order(&mut statement, filter.order_by, filter.order);

        if let Some(limit) = filter.limit {
            statement.limit(limit).offset(filter.offset);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Registration, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn list_all(&self, filter: ListFilter) -> anyhow::Result<Page<Registration>> {
        let mut count = Query::select()
            .expr(Func::count(Expr::col((
                AeRegistration::Table,
                AeRegistration::Id,
            ))))
            .from(AeRegistration::Table)
            .to_owned();
        apply_list_filter(&mut count, &filter);
        let total = self.count(count).await?;

        let mut statement = select();
        apply_list_filter(&mut statement, &filter);
        apply_order(&mut statement, filter.order_by, filter.order);

        if let Some(limit) = filter.limit {
            statement.limit(limit).offset(filter.offset);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let items = sqlx::query_as_with::<_, Registration, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(Page { items, total })
    }

    async fn count_by_event(&self, event_id: i64, status: Option<Status>) -> anyhow::Result<u64> {
        let mut statement = Query::select()
            .expr(Func::count(Expr::col(AeRegistration::Id)))
            .from(AeRegistration::Table)
            .and_where(Expr::col(AeRegistration::EventId).eq(event_id))
            .to_owned();

        match status {
            Some(status) => {
                statement.and_where(Expr::col(AeRegistration::Status).eq(status.to_string()));
            }
            None => {
                statement.and_where(
                    Expr::col(AeRegistration::Status).ne(Status::Cancelled.to_string()),
                );
            }
        }

        self.count(statement).await
    }

    async fn count_by_status(&self, event_id: Option<i64>) -> anyhow::Result<HashMap<Status, u64>> {
        let mut statement = Query::select()
            .column(AeRegistration::Status)
            .expr(Func::count(Expr::col(AeRegistration::Id)))
            .from(AeRegistration::Table)
            .group_by_col(AeRegistration::Status)
            .to_owned();

        if let Some(event_id) = event_id {
            statement.and_where(Expr::col(AeRegistration::EventId).eq(event_id));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (sqlx::types::Text<Status>, i64), _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        let mut counts = HashMap::new();
        for (status, count) in rows {
            counts.insert(status.0, u64::try_from(count)?);
        }

        Ok(counts)
    }

    async fn update_status(&self, id: i64, status: Status) -> anyhow::Result<bool> {
        let statement = Query::update()
            .table(AeRegistration::Table)
            .value(AeRegistration::Status, status.to_string())
            .and_where(Expr::col(AeRegistration::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let statement = Query::delete()
            .from_table(AeRegistration::Table)
            .and_where(Expr::col(AeRegistration::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_email_registered(&self, event_id: i64, email: &str) -> anyhow::Result<bool> {
        let statement = Query::select()
            .column(AeRegistration::Id)
            .from(AeRegistration::Table)
            .and_where(Expr::col(AeRegistration::EventId).eq(event_id))
            .and_where(Expr::col(AeRegistration::Email).eq(email))
            .and_where(Expr::col(AeRegistration::Status).ne(Status::Cancelled.to_string()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let found = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("ann"), "%ann%");
        assert_eq!(escape_like("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
