use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(AuditEntries::Id))
                    .col(string_null(AuditEntries::DocId).unique_key())
                    .col(integer(AuditEntries::WorkOrderId))
                    .col(
                        timestamp_with_time_zone(AuditEntries::ModifiedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(decimal_len(AuditEntries::Progress, 5, 2))
                    .col(text(AuditEntries::Comment))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_entries_work_order")
                            .from(AuditEntries::Table, AuditEntries::WorkOrderId)
                            .to(WorkOrders::Table, WorkOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_entries_work_order_id")
                    .table(AuditEntries::Table)
                    .col(AuditEntries::WorkOrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AuditEntries {
    Table,
    Id,
    DocId,
    WorkOrderId,
    ModifiedAt,
    Progress,
    Comment,
}

#[derive(DeriveIden)]
enum WorkOrders {
    Table,
    Id,
}
