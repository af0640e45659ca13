//! Service layer providing the catalog's business operations on top of models.
//! - Separates business logic from data access (`ProductRepository`).
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod product;
pub mod report;
pub mod ingestion;
pub mod auth;
#[cfg(test)]
pub mod test_support;
