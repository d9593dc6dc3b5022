//! Client side of the CRUD API: a headless form dialog generated from the
//! entity declarations, and an HTTP client that submits its results.

pub mod api;
pub mod dates;
pub mod errors;
pub mod form;

pub use api::ApiClient;
pub use errors::{ClientError, FormError};
pub use form::{DialogState, FormDialog, FormResult};
