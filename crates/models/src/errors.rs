use thiserror::Error;

/// Payload problems detected before any store interaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Campos requeridos faltantes: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Correo Electronico debe contener @")]
    InvalidEmail { field: String },
    #[error("El campo {label} debe tener máximo {max} caracteres")]
    TooLong { label: String, max: u32 },
}
