//! Service layer: generic CRUD over any declared entity.
//! - `Repository` abstracts persistence; one instance per entity descriptor.
//! - `CrudService` delegates to it and assembles pages.
//! - Errors from the store are classified into `ServiceError`, never swallowed.

pub mod errors;
pub mod pagination;
pub mod repository;
pub mod memory;
pub mod crud;
#[cfg(test)]
pub mod test_support;

pub use crud::CrudService;
pub use errors::ServiceError;
pub use memory::InMemoryRepository;
pub use pagination::{PageRequest, PageResult};
pub use repository::{Repository, SeaOrmRepository};
