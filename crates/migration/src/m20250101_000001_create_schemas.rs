//! Create one Postgres schema per binding (`clinica`, `restaurante`,
//! `venta_automoviles`).
use models::SchemaBinding;
use sea_orm_migration::prelude::*;

use crate::tables;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for binding in SchemaBinding::ALL {
            tables::create_schema(manager, binding).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for binding in SchemaBinding::ALL {
            tables::drop_schema(manager, binding).await?;
        }
        Ok(())
    }
}
