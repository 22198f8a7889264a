//! # Database Migrator
//!
//! Coordinates all migration operations and maintains the migration
//! history table.

use sea_orm_migration::prelude::*;

/// The main migrator that coordinates all migration operations
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// The migrations managed by this migrator, in execution order.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(crate::m20250610_000001_create_users_table::Migration),
            Box::new(crate::m20250610_000002_create_companies_table::Migration),
            Box::new(crate::m20250610_000003_create_reports_table::Migration),
            Box::new(crate::m20250610_000004_create_work_orders_table::Migration),
            Box::new(crate::m20250610_000005_create_audit_entries_table::Migration),
            Box::new(crate::m20250610_000006_create_auth_params_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_count() {
        let migrations = Migrator::migrations();
        assert_eq!(migrations.len(), 6);
    }
}
