//! Entity schema registry types.
//!
//! Every entity is a `static` [`EntityDescriptor`]: the repository, the route
//! set, the migrations and the client form are all driven by these values
//! instead of per-entity types.

use crate::errors::ModelError;
use crate::record::{is_blank, value_as_text, FieldMap};

/// Logical schema an entity's table lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaBinding {
    Clinica,
    Restaurante,
    Automoviles,
}

impl SchemaBinding {
    pub const ALL: [SchemaBinding; 3] = [Self::Clinica, Self::Restaurante, Self::Automoviles];

    /// Postgres schema holding the binding's tables.
    pub const fn schema(self) -> &'static str {
        match self {
            Self::Clinica => "clinica",
            Self::Restaurante => "restaurante",
            Self::Automoviles => "venta_automoviles",
        }
    }

    /// URL segment under `/api`.
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Clinica => "clinica",
            Self::Restaurante => "restaurante",
            Self::Automoviles => "automoviles",
        }
    }

    pub fn path_prefix(self) -> String {
        format!("/api/{}", self.segment())
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.segment() == segment)
    }
}

/// Which input widget the client renders for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Date,
}

/// Column type in the store. Values travel as text and are cast on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    Varchar(u32),
    Text,
    Integer,
    Decimal(u32, u32),
    Date,
    Timestamp,
}

impl SqlType {
    /// Type name used in `CAST(... AS <type>)`.
    pub fn cast_name(self) -> String {
        match self {
            Self::Varchar(n) => format!("varchar({n})"),
            Self::Text => "text".into(),
            Self::Integer => "bigint".into(),
            Self::Decimal(p, s) => format!("numeric({p}, {s})"),
            Self::Date => "date".into(),
            Self::Timestamp => "timestamp".into(),
        }
    }

    pub const fn max_len(self) -> Option<u32> {
        match self {
            Self::Varchar(n) => Some(n),
            _ => None,
        }
    }
}

/// Foreign key target inside the same schema binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    pub table: &'static str,
    pub column: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub sql: SqlType,
    pub required: bool,
    pub unique: bool,
    pub references: Option<Reference>,
}

impl FieldDescriptor {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind, sql: SqlType) -> Self {
        Self { name, label, kind, sql, required: true, unique: false, references: None }
    }

    pub const fn text(name: &'static str, label: &'static str, len: u32) -> Self {
        Self::new(name, label, FieldKind::Text, SqlType::Varchar(len))
    }

    pub const fn long_text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::LongText, SqlType::Text)
    }

    pub const fn email(name: &'static str, label: &'static str, len: u32) -> Self {
        Self::new(name, label, FieldKind::Email, SqlType::Varchar(len))
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date, SqlType::Date)
    }

    /// Date-picked field stored as a timestamp.
    pub const fn datetime(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date, SqlType::Timestamp)
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text, SqlType::Integer)
    }

    pub const fn decimal(name: &'static str, label: &'static str, precision: u32, scale: u32) -> Self {
        Self::new(name, label, FieldKind::Text, SqlType::Decimal(precision, scale))
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub const fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(Reference { table, column });
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Identifier {
    /// Store-generated integer in its own column.
    Serial { column: &'static str },
    /// Natural key carried by one of the declared fields.
    Natural { field: &'static str, len: usize },
}

impl Identifier {
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Serial { column } => *column,
            Self::Natural { field, .. } => *field,
        }
    }

    pub const fn is_natural(&self) -> bool {
        matches!(self, Self::Natural { .. })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Human name used in response messages.
    pub name: &'static str,
    /// Path segment of the entity's routes.
    pub resource: &'static str,
    pub binding: SchemaBinding,
    pub table: &'static str,
    pub identifier: Identifier,
    pub fields: &'static [FieldDescriptor],
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Required fields that are absent or blank in `fields`, in declared order.
    pub fn missing_required(&self, fields: &FieldMap) -> Vec<&'static str> {
        self.required_fields()
            .filter(|f| is_blank(fields.get(f.name)))
            .map(|f| f.name)
            .collect()
    }

    /// Required-field presence first, then per-value checks on the fields
    /// that were supplied.
    pub fn validate_payload(&self, fields: &FieldMap) -> Result<(), ModelError> {
        let missing = self.missing_required(fields);
        if !missing.is_empty() {
            return Err(ModelError::MissingFields(missing.into_iter().map(String::from).collect()));
        }
        for field in self.fields {
            let Some(text) = fields.get(field.name).and_then(value_as_text) else { continue };
            if field.kind == FieldKind::Email && !text.contains('@') {
                return Err(ModelError::InvalidEmail { field: field.name.to_string() });
            }
            if let Some(max) = field.sql.max_len() {
                if text.chars().count() > max as usize {
                    return Err(ModelError::TooLong { label: field.label.to_string(), max });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static FIELDS: [FieldDescriptor; 3] = [
        FieldDescriptor::text("nombre", "Nombre", 10),
        FieldDescriptor::email("correo", "Correo", 40).unique(),
        FieldDescriptor::long_text("notas", "Notas").optional(),
    ];

    static CONTACTO: EntityDescriptor = EntityDescriptor {
        name: "Contacto",
        resource: "contactos",
        binding: SchemaBinding::Restaurante,
        table: "contacto",
        identifier: Identifier::Serial { column: "id_contacto" },
        fields: &FIELDS,
    };

    fn map(v: serde_json::Value) -> FieldMap {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_required_lists_in_declared_order() {
        let missing = CONTACTO.missing_required(&map(json!({"notas": "x"})));
        assert_eq!(missing, vec!["nombre", "correo"]);
    }

    #[test]
    fn optional_fields_are_not_required() {
        let missing = CONTACTO.missing_required(&map(json!({"nombre": "Ana", "correo": "a@b.co"})));
        assert!(missing.is_empty());
    }

    #[test]
    fn validate_reports_missing_as_csv() {
        let err = CONTACTO.validate_payload(&map(json!({"nombre": " "}))).unwrap_err();
        assert_eq!(err.to_string(), "Campos requeridos faltantes: nombre, correo");
    }

    #[test]
    fn validate_rejects_email_without_at() {
        let err = CONTACTO
            .validate_payload(&map(json!({"nombre": "Ana", "correo": "ana.example.com"})))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidEmail { .. }));
    }

    #[test]
    fn validate_rejects_overlong_varchar() {
        let err = CONTACTO
            .validate_payload(&map(json!({"nombre": "Anastasia Maria", "correo": "a@b.co"})))
            .unwrap_err();
        assert_eq!(err, ModelError::TooLong { label: "Nombre".into(), max: 10 });
    }

    #[test]
    fn binding_segments_round_trip() {
        for b in SchemaBinding::ALL {
            assert_eq!(SchemaBinding::from_segment(b.segment()), Some(b));
        }
        assert_eq!(SchemaBinding::Automoviles.schema(), "venta_automoviles");
        assert_eq!(SchemaBinding::Clinica.path_prefix(), "/api/clinica");
    }

    #[test]
    fn cast_names() {
        assert_eq!(SqlType::Decimal(10, 2).cast_name(), "numeric(10, 2)");
        assert_eq!(SqlType::Varchar(15).cast_name(), "varchar(15)");
    }
}
