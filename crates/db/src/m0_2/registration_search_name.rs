use sea_query::{ColumnDef, Expr, ExprTrait, Query, Table, TableAlterStatement};

use crate::table::AeRegistration;

/// Adds `search_name`, the Unicode lower-cased copy of `name` used by
/// registration search, and backfills existing rows.
pub struct Operation;

fn up_statement() -> TableAlterStatement {
    Table::alter()
        .table(AeRegistration::Table)
        .add_column(
            ColumnDef::new(AeRegistration::SearchName)
                .string()
                .not_null()
                .default(""),
        )
        .to_owned()
}

fn down_statement() -> TableAlterStatement {
    Table::alter()
        .table(AeRegistration::Table)
        .drop_column(AeRegistration::SearchName)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(&mut *connection).await?;

        // SQLite lower() only folds ASCII
        let statement = Query::select()
            .columns([AeRegistration::Id, AeRegistration::Name])
            .from(AeRegistration::Table)
            .to_string(sea_query::SqliteQueryBuilder);
        let rows = sqlx::query_as::<_, (i64, String)>(&statement)
            .fetch_all(&mut *connection)
            .await?;

        for (id, name) in rows {
            let statement = Query::update()
                .table(AeRegistration::Table)
                .value(AeRegistration::SearchName, name.to_lowercase())
                .and_where(Expr::col(AeRegistration::Id).eq(id))
                .to_string(sea_query::SqliteQueryBuilder);
            sqlx::query(&statement).execute(&mut *connection).await?;
        }

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = down_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
