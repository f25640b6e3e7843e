use sea_query::{Index, IndexCreateStatement, IndexDropStatement};

use crate::table::AeRegistration;

pub struct Operation {
    pub name: &'static str,
    pub column: AeRegistration,
}

impl Operation {
    fn up_statement(&self) -> IndexCreateStatement {
        Index::create()
            .name(self.name)
            .table(AeRegistration::Table)
            .col(self.column.clone())
            .to_owned()
    }

    fn down_statement(&self) -> IndexDropStatement {
        Index::drop()
            .name(self.name)
            .table(AeRegistration::Table)
            .to_owned()
    }
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = self
            .up_statement()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = self
            .down_statement()
            .to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
