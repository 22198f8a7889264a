//! Users Entity
//!
//! Represents accounts that can sign in. The `email` column is the join key
//! used when reconciling against the secondary store, so it carries a unique
//! index. `blocked` and `failed_attempts` are owned by the auth gateway and
//! must not be mutated elsewhere.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:              i32,
    pub username:        String,
    #[sea_orm(unique)]
    pub email:           String,
    #[serde(skip_serializing)]
    pub password_hash:   String,
    pub role:            UserRole,
    pub blocked:         bool,
    pub failed_attempts: i32,
    pub created_at:      chrono::DateTime<chrono::Utc>,
    pub updated_at:      chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// User role enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserRole {
    /// Can manage users, parameters, and work orders
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Submits road-problem reports
    #[sea_orm(string_value = "reporter")]
    Reporter,
    /// Read-only access to the public map
    #[sea_orm(string_value = "visitor")]
    Visitor,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Manager => write!(f, "manager"),
            UserRole::Reporter => write!(f, "reporter"),
            UserRole::Visitor => write!(f, "visitor"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(UserRole::Manager),
            "reporter" => Ok(UserRole::Reporter),
            "visitor" => Ok(UserRole::Visitor),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
