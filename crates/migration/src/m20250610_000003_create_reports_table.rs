use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(pk_auto(Reports::Id))
                    .col(string_uniq(Reports::DocId))
                    .col(decimal_len(Reports::Latitude, 10, 6))
                    .col(decimal_len(Reports::Longitude, 10, 6))
                    .col(decimal_len_null(Reports::Surface, 12, 2))
                    .col(string_null(Reports::ProblemType))
                    .col(text_null(Reports::Description))
                    .col(string_len(Reports::Status, 32).default("nouveau"))
                    .col(string_null(Reports::ReporterId))
                    .col(
                        timestamp_with_time_zone(Reports::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    DocId,
    Latitude,
    Longitude,
    Surface,
    ProblemType,
    Description,
    Status,
    ReporterId,
    CreatedAt,
}
