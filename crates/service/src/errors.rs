use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unique or foreign-key violation; carries the store's text.
    #[error("{0}")]
    Constraint(String),
    #[error("{0}")]
    Store(String),
    #[error("Campo desconocido: {0}")]
    UnknownField(String),
    #[error("Falta el identificador {0}")]
    MissingIdentifier(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                Self::Constraint(msg)
            }
            _ => Self::Store(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_db_errors_become_store_errors() {
        let err: ServiceError = DbErr::Custom("connection reset".into()).into();
        assert!(matches!(err, ServiceError::Store(ref m) if m.contains("connection reset")));
    }

    #[test]
    fn constraint_text_is_passed_through() {
        let err = ServiceError::Constraint("duplicate key value".into());
        assert_eq!(err.to_string(), "duplicate key value");
    }
}
