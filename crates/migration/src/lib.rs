//! Migrator for the `system_role` schema.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_system_role;
mod m20240101_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_system_role::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000002_add_indexes::Migration),
        ]
    }
}
