//! Periodic import of products from the external content API.
//!
//! `client` talks HTTP, `job` maps entries into products, `scheduler`
//! drives the job from a cron expression.

pub mod client;
pub mod domain;
pub mod errors;
pub mod job;
pub mod scheduler;

pub use client::{ContentSource, HttpContentSource};
pub use errors::IngestionError;
pub use job::{IngestionJob, SinceMode};
pub use scheduler::IngestionScheduler;
