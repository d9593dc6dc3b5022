//! Create the automoviles tables (customers, sellers, vehicles, sales).
use models::SchemaBinding;
use sea_orm_migration::prelude::*;

use crate::tables;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        tables::create_binding(manager, SchemaBinding::Automoviles).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        tables::drop_binding(manager, SchemaBinding::Automoviles).await
    }
}
