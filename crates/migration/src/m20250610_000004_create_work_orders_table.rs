use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkOrders::Table)
                    .if_not_exists()
                    .col(pk_auto(WorkOrders::Id))
                    .col(string_null(WorkOrders::DocId).unique_key())
                    .col(integer(WorkOrders::ReportId))
                    .col(integer_null(WorkOrders::CompanyId))
                    .col(decimal_len_null(WorkOrders::Budget, 14, 2))
                    .col(date_null(WorkOrders::StartDate))
                    .col(date_null(WorkOrders::EndDate))
                    .col(
                        decimal_len(WorkOrders::Progress, 5, 2).default(0).check(
                            Expr::col(WorkOrders::Progress)
                                .gte(0)
                                .and(Expr::col(WorkOrders::Progress).lte(100)),
                        ),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_report")
                            .from(WorkOrders::Table, WorkOrders::ReportId)
                            .to(Reports::Table, Reports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_company")
                            .from(WorkOrders::Table, WorkOrders::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_work_orders_report_id")
                    .table(WorkOrders::Table)
                    .col(WorkOrders::ReportId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkOrders {
    Table,
    Id,
    DocId,
    ReportId,
    CompanyId,
    Budget,
    StartDate,
    EndDate,
    Progress,
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}
