//! Service layer providing the catalog operations on top of models.
//! - Separates request handling from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod domain;
pub mod errors;
pub mod events;
pub mod import_service;
pub mod pagination;
pub mod product_service;
#[cfg(test)]
pub mod test_support;
