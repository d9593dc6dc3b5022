//! Entity schema registry, dynamic record model and store connection.
//!
//! The three domains (clinic, restaurant, dealership) are plain
//! [`EntityDescriptor`](schema::EntityDescriptor) declarations; everything
//! downstream is generic over them.

pub mod errors;
pub mod db;
pub mod schema;
pub mod record;
pub mod catalog;
pub mod clinica;
pub mod restaurante;
pub mod automoviles;

pub use record::{FieldMap, Record, RecordId};
pub use schema::{EntityDescriptor, FieldDescriptor, FieldKind, Identifier, SchemaBinding, SqlType};
