use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use models::errors::ModelError;
use service::ServiceError;
use tracing::error;

pub const NOT_FOUND_MESSAGE: &str = "Recurso no encontrado";

/// Error leaving a handler; rendered as `{ "message": ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    /// Store failure: 500 with the error text, or `fallback` when it has none.
    pub fn store(err: ServiceError, fallback: &str) -> Self {
        let text = err.to_string();
        error!(error = %text, "store operation failed");
        let message = if text.trim().is_empty() { fallback.to_string() } else { text };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody::new(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_text_uses_fallback() {
        let err = ApiError::store(ServiceError::Store(String::new()), "Error al crear el recurso");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Error al crear el recurso");
    }

    #[test]
    fn store_text_wins_over_fallback() {
        let err = ApiError::store(ServiceError::Constraint("duplicate key".into()), "Error al crear el recurso");
        assert_eq!(err.message, "duplicate key");
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err: ApiError = ModelError::MissingFields(vec!["telefono".into()]).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Campos requeridos faltantes: telefono");
    }
}
