//! Aggregate statistics over the product table.

pub mod domain;
pub mod service;

pub use service::ReportService;
