//! # Routier Entities
//!
//! Sea-ORM entity definitions for the primary (relational) store: users,
//! companies, road-problem reports, work orders, their audit trail, and the
//! runtime authentication parameters.

pub mod audit_entries;
pub mod auth_params;
pub mod companies;
pub mod reports;
pub mod users;
pub mod work_orders;

pub use users::UserRole;
