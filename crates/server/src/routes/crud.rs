//! The four CRUD handlers, shared by every entity. Each request runs
//! parse, validate, execute, respond; the entity comes from the service state.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use common::types::{ListBody, MessageBody};
use models::{FieldMap, RecordId};
use serde::Deserialize;
use service::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use service::{CrudService, PageRequest, Repository};
use tracing::debug;

use crate::errors::ApiError;

/// Raw list query. Values that are not integers fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub filter: Option<String>,
}

fn int_or(raw: Option<&str>, default: u64) -> u64 {
    match raw.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(n) => n.max(1) as u64,
        None => default,
    }
}

impl ListParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(
            int_or(self.page.as_deref(), DEFAULT_PAGE),
            int_or(self.page_size.as_deref(), DEFAULT_PAGE_SIZE),
            self.filter.as_deref(),
        )
    }
}

fn parse_id(svc: &CrudService, raw: &str) -> Result<RecordId, ApiError> {
    RecordId::parse(&svc.descriptor().identifier, raw).ok_or_else(ApiError::not_found)
}

/// An unparsable or non-object body counts as an empty payload. A natural
/// key is trimmed before it is validated or stored.
fn payload(svc: &CrudService, body: Option<Json<FieldMap>>) -> FieldMap {
    let mut fields = body.map(|Json(fields)| fields).unwrap_or_default();
    RecordId::normalize_key(&svc.descriptor().identifier, &mut fields);
    fields
}

fn validate(svc: &CrudService, fields: &FieldMap) -> Result<(), ApiError> {
    svc.descriptor().validate_payload(fields).map_err(|e| {
        debug!(entity = svc.descriptor().resource, error = %e, "payload_rejected");
        ApiError::from(e)
    })
}

pub async fn list(
    State(svc): State<CrudService>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListBody>, ApiError> {
    let page = svc
        .list(params.to_request())
        .await
        .map_err(|e| ApiError::store(e, "Error al obtener los recursos"))?;
    let descriptor = svc.descriptor();
    Ok(Json(ListBody {
        data: page.items.iter().map(|r| r.project(descriptor)).collect(),
        pagination: page.pagination(),
    }))
}

pub async fn create(
    State(svc): State<CrudService>,
    body: Option<Json<FieldMap>>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let fields = payload(&svc, body);
    validate(&svc, &fields)?;
    svc.create(fields)
        .await
        .map_err(|e| ApiError::store(e, "Error al crear el recurso"))?;
    let message = format!("{} creado", svc.descriptor().name);
    Ok((StatusCode::CREATED, Json(MessageBody::new(message))))
}

pub async fn update(
    State(svc): State<CrudService>,
    Path(raw_id): Path<String>,
    body: Option<Json<FieldMap>>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&svc, &raw_id)?;
    let existing = svc
        .get_by_id(&id)
        .await
        .map_err(|e| ApiError::store(e, "Error al actualizar el recurso"))?;
    if existing.is_none() {
        return Err(ApiError::not_found());
    }

    let fields = payload(&svc, body);
    validate(&svc, &fields)?;
    match svc.update(&id, fields).await {
        Ok(Some(_)) => Ok(Json(MessageBody::new(format!("{} actualizado", svc.descriptor().name)))),
        // removed between lookup and write
        Ok(None) => Err(ApiError::not_found()),
        Err(e) => Err(ApiError::store(e, "Error al actualizar el recurso")),
    }
}

pub async fn delete(
    State(svc): State<CrudService>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&svc, &raw_id)?;
    let removed = svc
        .delete(&id)
        .await
        .map_err(|e| ApiError::store(e, "Error al eliminar el recurso"))?;
    if !removed {
        return Err(ApiError::not_found());
    }
    Ok(Json(MessageBody::new(format!("{} eliminado", svc.descriptor().name))))
}

/// `GET|POST /<resource>` and `PUT|DELETE /<resource>/:id` for one entity.
pub fn crud_routes(repository: Arc<dyn Repository>) -> Router {
    let resource = repository.descriptor().resource;
    Router::new()
        .route(&format!("/{resource}"), get(list).post(create))
        .route(&format!("/{resource}/:id"), put(update).delete(delete))
        .with_state(CrudService::new(repository))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, size: Option<&str>) -> ListParams {
        ListParams { page: page.map(Into::into), page_size: size.map(Into::into), filter: None }
    }

    #[test]
    fn defaults_when_absent_or_not_numeric() {
        let req = params(None, Some("abc")).to_request();
        assert_eq!((req.page, req.page_size), (1, 10));
    }

    #[test]
    fn values_below_one_are_clamped() {
        let req = params(Some("-3"), Some("0")).to_request();
        assert_eq!((req.page, req.page_size), (1, 1));
    }

    #[test]
    fn filter_is_lowercased() {
        let p = ListParams { filter: Some("ANA".into()), ..Default::default() };
        assert_eq!(p.to_request().filter.as_deref(), Some("ana"));
    }
}
