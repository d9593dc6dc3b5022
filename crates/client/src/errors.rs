use thiserror::Error;

/// Local validation failures; the dialog stays open after any of them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("El campo {label} es requerido")]
    Required { label: String },
    #[error("El correo electrónico no es válido")]
    InvalidEmail,
    #[error("La fecha del campo {label} no es válida")]
    InvalidDate { label: String },
    #[error("Campo desconocido: {0}")]
    UnknownField(String),
    #[error("El campo {0} no es una fecha")]
    NotADate(String),
    #[error("El formulario ya está cerrado")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer; `message` is the server's `{message}` body.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
