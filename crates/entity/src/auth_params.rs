//! Auth Parameters Entity
//!
//! Flat key/value/description triples consumed by the auth gateway on every
//! authentication evaluation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_params")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key:         String,
    pub value:       String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
