//! Reports Entity
//!
//! A user-submitted road-surface problem with its location and status.
//! `doc_id` is the opaque id of the matching document in the secondary
//! store; rows imported by reconciliation are keyed on it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:           i32,
    #[sea_orm(unique)]
    pub doc_id:       String,
    pub latitude:     Decimal,
    pub longitude:    Decimal,
    pub surface:      Option<Decimal>,
    pub problem_type: Option<String>,
    pub description:  Option<String>,
    /// Wire values: `nouveau`, `en cours`, `terminé`
    pub status:       String,
    /// Opaque id of the reporting user in the secondary store
    pub reporter_id:  Option<String>,
    pub created_at:   chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_orders::Entity")]
    WorkOrders,
}

impl Related<super::work_orders::Entity> for Entity {
    fn to() -> RelationDef { Relation::WorkOrders.def() }
}

impl ActiveModelBehavior for ActiveModel {}
