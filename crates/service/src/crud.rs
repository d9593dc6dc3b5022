use std::sync::Arc;

use models::{EntityDescriptor, FieldMap, Record, RecordId};
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::pagination::{PageRequest, PageResult};
use crate::repository::Repository;

/// Thin business facade over one entity's repository.
#[derive(Clone)]
pub struct CrudService {
    repo: Arc<dyn Repository>,
}

impl CrudService {
    pub fn new(repo: Arc<dyn Repository>) -> Self { Self { repo } }

    pub fn descriptor(&self) -> &'static EntityDescriptor { self.repo.descriptor() }

    pub async fn get_all(&self) -> Result<Vec<Record>, ServiceError> {
        self.repo.get_all().await
    }

    pub async fn get_by_id(&self, id: &RecordId) -> Result<Option<Record>, ServiceError> {
        self.repo.get_by_id(id).await
    }

    pub async fn create(&self, fields: FieldMap) -> Result<Record, ServiceError> {
        let record = self.repo.create(fields).await?;
        info!(entity = self.descriptor().resource, id = %record.id, "record_created");
        Ok(record)
    }

    pub async fn update(&self, id: &RecordId, fields: FieldMap) -> Result<Option<Record>, ServiceError> {
        let updated = self.repo.update(id, fields).await?;
        if updated.is_some() {
            info!(entity = self.descriptor().resource, id = %id, "record_updated");
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<bool, ServiceError> {
        let removed = self.repo.delete(id).await?;
        if removed {
            info!(entity = self.descriptor().resource, id = %id, "record_deleted");
        }
        Ok(removed)
    }

    /// One page of records plus the counters derived from the filtered total.
    pub async fn list(&self, request: PageRequest) -> Result<PageResult<Record>, ServiceError> {
        let (items, total) = self
            .repo
            .find_page(request.filter.as_deref(), request.offset(), request.page_size)
            .await?;
        debug!(
            entity = self.descriptor().resource,
            page = request.page,
            page_size = request.page_size,
            total,
            "page_listed"
        );
        Ok(PageResult::new(items, &request, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRepository;
    use models::clinica;
    use serde_json::json;

    fn service() -> CrudService {
        CrudService::new(Arc::new(InMemoryRepository::new(&clinica::TRATAMIENTO)))
    }

    fn tratamiento(nombre: &str) -> FieldMap {
        json!({"nombre": nombre, "descripcion": "-", "costo": "10.00"}).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn list_builds_page_counters() {
        let svc = service();
        for i in 0..25 {
            svc.create(tratamiento(&format!("T{i}"))).await.unwrap();
        }
        let page = svc.list(PageRequest::new(3, 10, None)).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_records, 25);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[tokio::test]
    async fn list_past_the_end_is_empty() {
        let svc = service();
        svc.create(tratamiento("Terapia")).await.unwrap();
        let page = svc.list(PageRequest::new(5, 10, None)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_records, 1);
    }

    #[tokio::test]
    async fn delegates_crud() {
        let svc = service();
        let rec = svc.create(tratamiento("Terapia")).await.unwrap();
        assert_eq!(svc.get_all().await.unwrap().len(), 1);
        let upd = svc.update(&rec.id, tratamiento("Masaje")).await.unwrap().unwrap();
        assert_eq!(upd.get("nombre"), Some(&json!("Masaje")));
        assert!(svc.delete(&rec.id).await.unwrap());
        assert!(svc.get_by_id(&rec.id).await.unwrap().is_none());
    }
}
