//! Audit Entries Entity
//!
//! Append-only history of work-order progress changes. Corrections are new
//! entries, never edits; `before_save` enforces this at the ORM layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:            i32,
    #[sea_orm(unique)]
    pub doc_id:        Option<String>,
    pub work_order_id: i32,
    pub modified_at:   chrono::DateTime<chrono::Utc>,
    pub progress:      Decimal,
    pub comment:       String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_orders::Entity",
        from = "Column::WorkOrderId",
        to = "super::work_orders::Column::Id"
    )]
    WorkOrder,
}

impl Related<super::work_orders::Entity> for Entity {
    fn to() -> RelationDef { Relation::WorkOrder.def() }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: sea_orm::ConnectionTrait,
    {
        if insert {
            Ok(self)
        }
        else {
            Err(DbErr::Custom(
                "audit entries are append-only; insert a new entry instead".to_owned(),
            ))
        }
    }
}
