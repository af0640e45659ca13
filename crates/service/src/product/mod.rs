//! Product module: domain types, query filters, repository abstraction and service.

pub mod domain;
pub mod query;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::ProductService;
