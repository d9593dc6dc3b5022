//! Descriptor-driven DDL shared by the per-binding migrations.

use models::{catalog, EntityDescriptor, FieldDescriptor, Identifier, SchemaBinding, SqlType};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

fn table_ref(d: &EntityDescriptor) -> (Alias, Alias) {
    (Alias::new(d.binding.schema()), Alias::new(d.table))
}

fn column_def(field: &FieldDescriptor, primary: bool) -> ColumnDef {
    let mut col = ColumnDef::new(Alias::new(field.name));
    match field.sql {
        SqlType::Varchar(n) => col.string_len(n),
        SqlType::Text => col.text(),
        SqlType::Integer => col.big_integer(),
        SqlType::Decimal(p, s) => col.decimal_len(p, s),
        SqlType::Date => col.date(),
        SqlType::Timestamp => col.timestamp(),
    };
    if field.required || primary {
        col.not_null();
    } else {
        col.null();
    }
    if field.unique {
        col.unique_key();
    }
    if primary {
        col.primary_key();
    }
    col
}

pub async fn create_schema(manager: &SchemaManager<'_>, binding: SchemaBinding) -> Result<(), DbErr> {
    manager
        .get_connection()
        .execute_unprepared(&format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", binding.schema()))
        .await?;
    Ok(())
}

pub async fn drop_schema(manager: &SchemaManager<'_>, binding: SchemaBinding) -> Result<(), DbErr> {
    manager
        .get_connection()
        .execute_unprepared(&format!("DROP SCHEMA IF EXISTS \"{}\"", binding.schema()))
        .await?;
    Ok(())
}

pub async fn create_entity_table(manager: &SchemaManager<'_>, d: &EntityDescriptor) -> Result<(), DbErr> {
    let mut table = Table::create();
    table.table(table_ref(d)).if_not_exists();

    if let Identifier::Serial { column } = d.identifier {
        table.col(
            ColumnDef::new(Alias::new(column))
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        );
    }
    for field in d.fields {
        let primary = d.identifier.is_natural() && d.identifier.column() == field.name;
        table.col(column_def(field, primary));
    }
    for field in d.fields {
        let Some(target) = field.references else { continue };
        table.foreign_key(
            ForeignKey::create()
                .name(format!("fk_{}_{}", d.table, field.name))
                .from(table_ref(d), Alias::new(field.name))
                .to((Alias::new(d.binding.schema()), Alias::new(target.table)), Alias::new(target.column))
                // rows still referenced elsewhere cannot be deleted
                .on_delete(ForeignKeyAction::Restrict)
                .on_update(ForeignKeyAction::Cascade),
        );
    }

    manager.create_table(table.to_owned()).await
}

pub async fn drop_entity_table(manager: &SchemaManager<'_>, d: &EntityDescriptor) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(table_ref(d)).if_exists().to_owned())
        .await
}

/// Create every table of a binding in dependency order.
pub async fn create_binding(manager: &SchemaManager<'_>, binding: SchemaBinding) -> Result<(), DbErr> {
    for d in catalog::entities(binding) {
        create_entity_table(manager, d).await?;
    }
    Ok(())
}

/// Drop every table of a binding, dependents first.
pub async fn drop_binding(manager: &SchemaManager<'_>, binding: SchemaBinding) -> Result<(), DbErr> {
    for d in catalog::entities(binding).iter().rev() {
        drop_entity_table(manager, d).await?;
    }
    Ok(())
}

fn index_name(d: &EntityDescriptor, field: &FieldDescriptor) -> String {
    format!("idx_{}_{}", d.table, field.name)
}

/// Index every foreign-key column; joins and FK checks hit them.
pub async fn create_reference_indexes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    for d in catalog::all() {
        for field in d.fields.iter().filter(|f| f.references.is_some()) {
            manager
                .create_index(
                    Index::create()
                        .name(index_name(d, field))
                        .table(table_ref(d))
                        .col(Alias::new(field.name))
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
    }
    Ok(())
}

pub async fn drop_reference_indexes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let conn = manager.get_connection();
    for d in catalog::all() {
        for field in d.fields.iter().filter(|f| f.references.is_some()) {
            conn.execute_unprepared(&format!(
                "DROP INDEX IF EXISTS \"{}\".\"{}\"",
                d.binding.schema(),
                index_name(d, field)
            ))
            .await?;
        }
    }
    Ok(())
}
