//! Migrator creating the three schemas and every declared table.
//! Tables are generated from the entity descriptors; indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod tables;
mod m20250101_000001_create_schemas;
mod m20250101_000002_create_clinica;
mod m20250101_000003_create_restaurante;
mod m20250101_000004_create_automoviles;
mod m20250101_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_schemas::Migration),
            Box::new(m20250101_000002_create_clinica::Migration),
            Box::new(m20250101_000003_create_restaurante::Migration),
            Box::new(m20250101_000004_create_automoviles::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000005_add_indexes::Migration),
        ]
    }
}
