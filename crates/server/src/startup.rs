use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use migration::MigratorTrait;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::AppConfig;
use service::ingestion::{HttpContentSource, IngestionJob, IngestionScheduler, SinceMode};
use service::product::repo::seaorm::SeaOrmProductRepository;
use service::product::repository::ProductRepository;

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Start the cron-driven ingestion loop unless disabled.
pub fn start_ingestion(cfg: &AppConfig, repo: Arc<dyn ProductRepository>) -> anyhow::Result<Option<JoinHandle<()>>> {
    if !cfg.ingestion.enabled {
        warn!(service = "ingestion", event = "disabled", "ingestion scheduler not started");
        return Ok(None);
    }
    let source = HttpContentSource::from_config(&cfg.ingestion)?;
    let job = IngestionJob::new(Arc::new(source), repo, SinceMode::from_config(cfg)?);
    let schedule = cfg.ingestion_schedule();
    let scheduler = IngestionScheduler::new(schedule, Arc::new(job))?;
    info!(service = "ingestion", event = "scheduled", schedule, test_mode = cfg.test_mode, "ingestion scheduler configured");
    Ok(Some(scheduler.spawn()))
}

/// Router over an arbitrary repository; used by `run` and by tests.
pub fn build_app(cfg: &AppConfig, repo: Arc<dyn ProductRepository>) -> Router {
    let state = ServerState::new(repo, cfg);
    routes::build_router(state, build_cors(), cfg.server.serve_docs)
}

/// Public entry: connect, migrate, schedule ingestion and serve HTTP until the listener fails.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(service = "server", event = "migrated", "database schema up to date");

    if cfg.test_mode {
        warn!(service = "server", event = "test_mode", since = %cfg.ingestion.fixed_since, "TEST MODE: ingestion runs every minute from a fixed lower bound");
    }
    common::metrics::register_all();
    let repo: Arc<dyn ProductRepository> = Arc::new(SeaOrmProductRepository::new(db));
    let scheduler = start_ingestion(&cfg, Arc::clone(&repo))?;

    let app = build_app(&cfg, repo);
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, docs = cfg.server.serve_docs, "http listener bound");

    let served = axum::serve(listener, app).await;
    if let Some(h) = scheduler {
        h.abort();
    }
    served?;
    Ok(())
}
