use std::sync::Arc;

use axum::{routing::get, Json, Router};
use common::types::Health;
use models::{catalog, EntityDescriptor, SchemaBinding};
use service::Repository;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod crud;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok".into() })
}

/// Routes of every entity in one binding, relative to its prefix.
pub fn binding_router<F>(binding: SchemaBinding, repository_for: &F) -> Router
where
    F: Fn(&'static EntityDescriptor) -> Arc<dyn Repository>,
{
    catalog::entities(binding)
        .iter()
        .fold(Router::new(), |router, d| router.merge(crud::crud_routes(repository_for(d))))
}

/// Build the full application router: health plus one nested route set per
/// schema binding, each entity backed by `repository_for(descriptor)`.
pub fn build_router<F>(repository_for: F, cors: CorsLayer) -> Router
where
    F: Fn(&'static EntityDescriptor) -> Arc<dyn Repository>,
{
    let app = SchemaBinding::ALL.into_iter().fold(
        Router::new().route("/health", get(health)),
        |app, binding| app.nest(&binding.path_prefix(), binding_router(binding, &repository_for)),
    );

    app.layer(cors).layer(
        TraceLayer::new_for_http()
            // one INFO span per request with method and path
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            // status and latency
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            // 5xx and friends at ERROR
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use service::InMemoryRepository;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(
            |d| Arc::new(InMemoryRepository::new(d)) as Arc<dyn Repository>,
            CorsLayer::very_permissive(),
        )
    }

    async fn status_of(method: Method, uri: &str) -> StatusCode {
        let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        app().oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn every_entity_is_mounted_under_its_binding() {
        for d in catalog::all() {
            let uri = format!("{}/{}", d.binding.path_prefix(), d.resource);
            assert_eq!(status_of(Method::GET, &uri).await, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn resources_are_not_shared_across_bindings() {
        assert_eq!(status_of(Method::GET, "/api/clinica/vehiculos").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of(Method::GET, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn non_numeric_serial_id_is_not_found() {
        assert_eq!(status_of(Method::DELETE, "/api/restaurante/platos/abc").await, StatusCode::NOT_FOUND);
    }
}
