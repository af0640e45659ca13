use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use super::client::{format_since, ContentSource};
use super::domain::ContentItem;
use super::errors::IngestionError;
use crate::product::domain::NewProduct;
use crate::product::repository::ProductRepository;
use common::metrics::{INGESTION_FAILURES_TOTAL, INGESTION_RUNS_TOTAL, PRODUCTS_INGESTED_TOTAL};

/// How far back each run asks the content API to look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinceMode {
    /// `now - window`
    Trailing(Duration),
    /// Always the same instant; used in test mode.
    Fixed(DateTime<Utc>),
}

impl SinceMode {
    pub fn from_config(cfg: &configs::AppConfig) -> Result<Self, IngestionError> {
        if !cfg.test_mode {
            return Ok(SinceMode::Trailing(Duration::hours(1)));
        }
        let fixed = DateTime::parse_from_rfc3339(cfg.ingestion.fixed_since.trim())
            .map_err(|e| IngestionError::Config(format!("fixed_since: {e}")))?;
        Ok(SinceMode::Fixed(fixed.with_timezone(&Utc)))
    }

    pub fn lower_bound(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            SinceMode::Trailing(window) => now - *window,
            SinceMode::Fixed(at) => *at,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub fetched: usize,
    pub inserted: usize,
    pub skipped: usize,
}

pub struct IngestionJob {
    source: Arc<dyn ContentSource>,
    repo: Arc<dyn ProductRepository>,
    since: SinceMode,
}

impl IngestionJob {
    pub fn new(source: Arc<dyn ContentSource>, repo: Arc<dyn ProductRepository>, since: SinceMode) -> Self {
        Self { source, repo, since }
    }

    /// One fetch followed by one insert per usable entry. Stops at the first storage error.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<IngestionSummary, IngestionError> {
        let since = self.since.lower_bound(Utc::now());
        info!(since = %format_since(since), "ingestion_started");
        let items = self.source.fetch_since(since).await?;
        let mut summary = IngestionSummary { fetched: items.len(), ..Default::default() };
        info!(fetched = summary.fetched, "ingestion_fetched");

        for item in items {
            let Some(new) = to_new_product(&item) else {
                summary.skipped += 1;
                continue;
            };
            let saved = self.repo.insert(new).await?;
            PRODUCTS_INGESTED_TOTAL.inc();
            summary.inserted += 1;
            info!(product_id = saved.id, product_name = %saved.name, "ingestion_saved_product");
        }
        Ok(summary)
    }

    /// Scheduler entry point: runs once and logs instead of propagating failures.
    pub async fn tick(&self) -> Option<IngestionSummary> {
        INGESTION_RUNS_TOTAL.inc();
        match self.run_once().await {
            Ok(summary) => {
                info!(inserted = summary.inserted, skipped = summary.skipped, "ingestion_finished");
                Some(summary)
            }
            Err(e) => {
                INGESTION_FAILURES_TOTAL.inc();
                let err = anyhow::Error::from(e);
                error!(error = %format!("{err:#}"), "ingestion_failed");
                None
            }
        }
    }
}

fn to_new_product(item: &ContentItem) -> Option<NewProduct> {
    let f = &item.fields;
    let (Some(name), Some(category)) = (f.name.as_deref(), f.category.as_deref()) else {
        warn!(created_at = %item.sys.created_at, "ingestion_entry_missing_fields");
        return None;
    };
    let price = match f.price {
        Some(raw) => match Decimal::from_str(&raw.to_string()) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(product_name = name, price = raw, error = %e, "ingestion_entry_bad_price");
                return None;
            }
        },
        None => None,
    };
    match NewProduct::new(name, category, price, item.sys.created_at) {
        Ok(p) => Some(p),
        Err(e) => {
            warn!(product_name = name, error = %e, "ingestion_entry_rejected");
            None
        }
    }
}
