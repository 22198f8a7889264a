//! # Routier Migrations
//!
//! Sea-ORM schema migrations for the primary store.

pub use sea_orm_migration::MigratorTrait;

mod m20250610_000001_create_users_table;
mod m20250610_000002_create_companies_table;
mod m20250610_000003_create_reports_table;
mod m20250610_000004_create_work_orders_table;
mod m20250610_000005_create_audit_entries_table;
mod m20250610_000006_create_auth_params_table;
mod migrator;

pub use migrator::Migrator;
