//! Dynamic records: a field map plus an identifier whose kind depends on the
//! entity (surrogate integer or natural key).

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{EntityDescriptor, Identifier};

/// Field name to JSON value, as received from or sent to HTTP clients.
pub type FieldMap = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Serial(i64),
    Natural(String),
}

impl RecordId {
    /// Parse a path segment according to the entity's identifier kind.
    /// Returns `None` when the text cannot be an identifier of that entity.
    pub fn parse(identifier: &Identifier, raw: &str) -> Option<Self> {
        match identifier {
            Identifier::Serial { .. } => raw.trim().parse::<i64>().ok().map(Self::Serial),
            Identifier::Natural { len, .. } => {
                let raw = raw.trim();
                (!raw.is_empty() && raw.chars().count() <= *len).then(|| Self::Natural(raw.to_string()))
            }
        }
    }

    /// Extract the natural key carried by a payload, if the entity uses one.
    pub fn from_fields(identifier: &Identifier, fields: &FieldMap) -> Option<Self> {
        match identifier {
            Identifier::Serial { .. } => None,
            Identifier::Natural { field, .. } => fields
                .get(*field)
                .and_then(value_as_text)
                .map(|v| Self::Natural(v.trim().to_string()))
                .filter(|id| !matches!(id, Self::Natural(s) if s.is_empty())),
        }
    }

    /// Trim a textual natural key in place so the stored key is the one
    /// `from_fields` and `parse` address.
    pub fn normalize_key(identifier: &Identifier, fields: &mut FieldMap) {
        if let Identifier::Natural { field, .. } = identifier {
            if let Some(Value::String(key)) = fields.get_mut(*field) {
                let trimmed = key.trim();
                if trimmed.len() != key.len() {
                    *key = trimmed.to_string();
                }
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Serial(n) => Value::from(*n),
            Self::Natural(s) => Value::from(s.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(n) => write!(f, "{n}"),
            Self::Natural(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub fields: FieldMap,
}

impl Record {
    pub fn new(id: RecordId, fields: FieldMap) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// `{id, <each declared field>}` projection used by list responses.
    pub fn project(&self, descriptor: &EntityDescriptor) -> FieldMap {
        let mut out = Map::new();
        out.insert("id".into(), self.id.to_json());
        for field in descriptor.fields {
            let value = self.fields.get(field.name).cloned().unwrap_or(Value::Null);
            out.insert(field.name.into(), value);
        }
        out
    }
}

/// Textual form of a JSON scalar. `null` has no text; arrays and objects are
/// rendered as JSON.
pub fn value_as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Absent, `null` and whitespace-only values all count as blank.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value.and_then(value_as_text) {
        Some(text) => text.trim().is_empty(),
        None => true,
    }
}
