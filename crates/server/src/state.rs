use std::sync::Arc;

use configs::AppConfig;
use service::auth::{AuthService, TokenConfig};
use service::product::repository::ProductRepository;
use service::product::ProductService;
use service::report::ReportService;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub products: Arc<ProductService>,
    pub reports: Arc<ReportService>,
    pub auth: Arc<AuthService>,
    /// Reject requests without a valid bearer token outside the public paths.
    pub require_token: bool,
}

impl ServerState {
    pub fn new(repo: Arc<dyn ProductRepository>, cfg: &AppConfig) -> Self {
        Self {
            products: Arc::new(ProductService::new(repo.clone(), cfg.pagination.page_size)),
            reports: Arc::new(ReportService::new(repo)),
            auth: Arc::new(AuthService::new(TokenConfig::from(&cfg.auth))),
            require_token: cfg.auth.require_token,
        }
    }
}
