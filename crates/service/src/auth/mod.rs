//! Auth module: placeholder login issuing signed tokens, plus token verification.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::{AuthService, TokenConfig};
