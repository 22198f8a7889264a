use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthParams::Table)
                    .if_not_exists()
                    .col(string_len(AuthParams::Key, 100).primary_key())
                    .col(string(AuthParams::Value))
                    .col(text_null(AuthParams::Description))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthParams::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AuthParams {
    Table,
    Key,
    Value,
    Description,
}
