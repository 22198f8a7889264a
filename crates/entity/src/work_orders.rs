//! Work Orders Entity
//!
//! A company-assigned remediation effort against one report, carrying
//! budget, schedule, and progress. Progress is always derived from the
//! report status, never set directly by callers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:         i32,
    #[sea_orm(unique)]
    pub doc_id:     Option<String>,
    pub report_id:  i32,
    pub company_id: Option<i32>,
    pub budget:     Option<Decimal>,
    pub start_date: Option<Date>,
    pub end_date:   Option<Date>,
    /// Canonical progress percentage in [0, 100]
    pub progress:   Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reports::Entity",
        from = "Column::ReportId",
        to = "super::reports::Column::Id"
    )]
    Report,
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Company,
    #[sea_orm(has_many = "super::audit_entries::Entity")]
    AuditEntries,
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef { Relation::Report.def() }
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl Related<super::audit_entries::Entity> for Entity {
    fn to() -> RelationDef { Relation::AuditEntries.def() }
}

impl ActiveModelBehavior for ActiveModel {}
