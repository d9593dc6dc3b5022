//! In-memory repository for tests and demos. Enforces natural-key presence,
//! primary-key uniqueness and `unique` fields; foreign keys are not checked.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use models::record::value_as_text;
use models::{EntityDescriptor, FieldMap, Identifier, Record, RecordId};
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::repository::{check_known_fields, matches_filter, Repository};

pub struct InMemoryRepository {
    descriptor: &'static EntityDescriptor,
    rows: RwLock<Vec<Record>>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    pub fn new(descriptor: &'static EntityDescriptor) -> Self {
        Self { descriptor, rows: RwLock::new(Vec::new()), next_id: AtomicI64::new(1) }
    }

    fn natural_id(&self, fields: &FieldMap) -> Result<Option<RecordId>, ServiceError> {
        let identifier = &self.descriptor.identifier;
        match identifier {
            Identifier::Serial { .. } => Ok(None),
            Identifier::Natural { field, .. } => RecordId::from_fields(identifier, fields)
                .map(Some)
                .ok_or_else(|| ServiceError::MissingIdentifier(field.to_string())),
        }
    }

    /// Primary-key and unique-field checks against every row but `skip`.
    fn check_constraints(&self, rows: &[Record], candidate: &Record, skip: Option<usize>) -> Result<(), ServiceError> {
        let others = rows.iter().enumerate().filter(|(i, _)| Some(*i) != skip).map(|(_, r)| r);
        for other in others {
            if other.id == candidate.id {
                return Err(ServiceError::Constraint(format!(
                    "duplicate key value violates unique constraint \"{}_pkey\"",
                    self.descriptor.table
                )));
            }
            for field in self.descriptor.fields.iter().filter(|f| f.unique) {
                let mine = candidate.get(field.name).and_then(value_as_text);
                if mine.is_some() && mine == other.get(field.name).and_then(value_as_text) {
                    return Err(ServiceError::Constraint(format!(
                        "duplicate key value violates unique constraint \"{}_{}_key\"",
                        self.descriptor.table, field.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    async fn get_all(&self) -> Result<Vec<Record>, ServiceError> {
        Ok(self.rows.read().await.clone())
    }

    async fn get_by_id(&self, id: &RecordId) -> Result<Option<Record>, ServiceError> {
        Ok(self.rows.read().await.iter().find(|r| &r.id == id).cloned())
    }

    async fn create(&self, mut fields: FieldMap) -> Result<Record, ServiceError> {
        check_known_fields(self.descriptor, &fields)?;
        RecordId::normalize_key(&self.descriptor.identifier, &mut fields);
        let mut rows = self.rows.write().await;
        let id = match self.natural_id(&fields)? {
            Some(id) => id,
            None => RecordId::Serial(self.next_id.load(Ordering::SeqCst)),
        };
        let record = Record::new(id, fields);
        self.check_constraints(&rows, &record, None)?;
        // serials are only consumed by successful inserts
        if matches!(record.id, RecordId::Serial(_)) {
            self.next_id.fetch_add(1, Ordering::SeqCst);
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, mut fields: FieldMap) -> Result<Option<Record>, ServiceError> {
        check_known_fields(self.descriptor, &fields)?;
        RecordId::normalize_key(&self.descriptor.identifier, &mut fields);
        let mut rows = self.rows.write().await;
        let Some(idx) = rows.iter().position(|r| &r.id == id) else {
            return Ok(None);
        };
        let mut merged = rows[idx].clone();
        merged.fields.extend(fields);
        if let Some(new_id) = self.natural_id(&merged.fields)? {
            merged.id = new_id;
        }
        self.check_constraints(&rows, &merged, Some(idx))?;
        rows[idx] = merged.clone();
        Ok(Some(merged))
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, ServiceError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| &r.id != id);
        Ok(rows.len() < before)
    }

    async fn find_page(
        &self,
        filter: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Record>, u64), ServiceError> {
        let rows = self.rows.read().await;
        let matching: Vec<&Record> = rows
            .iter()
            .filter(|r| filter.map_or(true, |f| matches_filter(self.descriptor, &r.fields, f)))
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((items, total))
    }
}
