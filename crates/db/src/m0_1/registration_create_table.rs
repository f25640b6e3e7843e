use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::AeRegistration;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(AeRegistration::Table)
        .col(
            ColumnDef::new(AeRegistration::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(AeRegistration::EventId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(AeRegistration::Name)
                .string()
                .not_null()
                .string_len(255),
        )
        .col(
            ColumnDef::new(AeRegistration::Email)
                .string()
                .not_null()
                .string_len(100),
        )
        .col(
            ColumnDef::new(AeRegistration::Phone)
                .string()
                .not_null()
                .string_len(20)
                .default(""),
        )
        .col(
            ColumnDef::new(AeRegistration::Status)
                .string()
                .not_null()
                .string_len(20)
                .default("confirmed"),
        )
        .col(
            ColumnDef::new(AeRegistration::RegistrationDate)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(AeRegistration::Meta).text())
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(AeRegistration::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

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
