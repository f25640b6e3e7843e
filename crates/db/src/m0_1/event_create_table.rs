use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::AeEvent;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(AeEvent::Table)
        .col(
            ColumnDef::new(AeEvent::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(AeEvent::Title)
                .string()
                .not_null()
                .string_len(255),
        )
        .col(ColumnDef::new(AeEvent::StartDate).string().string_len(10))
        .col(ColumnDef::new(AeEvent::StartTime).string().string_len(8))
        .col(ColumnDef::new(AeEvent::EndDate).string().string_len(10))
        .col(ColumnDef::new(AeEvent::EndTime).string().string_len(8))
        .col(ColumnDef::new(AeEvent::Venue).string().string_len(255))
        .col(ColumnDef::new(AeEvent::Address).string().string_len(255))
        .col(ColumnDef::new(AeEvent::City).string().string_len(100))
        .col(ColumnDef::new(AeEvent::State).string().string_len(100))
        .col(ColumnDef::new(AeEvent::Zip).string().string_len(20))
        .col(ColumnDef::new(AeEvent::VirtualUrl).string().string_len(2048))
        .col(
            ColumnDef::new(AeEvent::Capacity)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(AeEvent::WaitlistEnabled)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(AeEvent::RegistrationEnabled)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(ColumnDef::new(AeEvent::RegistrationCloseAt).big_integer())
        .col(ColumnDef::new(AeEvent::CreatedAt).big_integer().not_null())
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(AeEvent::Table).to_owned()
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
