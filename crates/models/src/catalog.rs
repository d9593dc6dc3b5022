//! Lookup over every declared entity, grouped by schema binding.

use crate::schema::{EntityDescriptor, SchemaBinding};
use crate::{automoviles, clinica, restaurante};

/// Entities of one binding, referenced tables first.
pub fn entities(binding: SchemaBinding) -> &'static [&'static EntityDescriptor] {
    match binding {
        SchemaBinding::Clinica => &clinica::ENTITIES,
        SchemaBinding::Restaurante => &restaurante::ENTITIES,
        SchemaBinding::Automoviles => &automoviles::ENTITIES,
    }
}

pub fn all() -> impl Iterator<Item = &'static EntityDescriptor> {
    SchemaBinding::ALL.into_iter().flat_map(|b| entities(b).iter().copied())
}

pub fn find(binding: SchemaBinding, resource: &str) -> Option<&'static EntityDescriptor> {
    entities(binding).iter().copied().find(|d| d.resource == resource)
}
