use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static INGESTION_RUNS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "product_catalog_ingestion_runs_total",
        "Total ingestion ticks started"
    )
    .expect("register ingestion_runs_total")
});

pub static INGESTION_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "product_catalog_ingestion_failures_total",
        "Total ingestion ticks that ended in an error"
    )
    .expect("register ingestion_failures_total")
});

pub static PRODUCTS_INGESTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "product_catalog_products_ingested_total",
        "Total products inserted by the ingestion job"
    )
    .expect("register products_ingested_total")
});

/// Touch every metric so they show up in the first scrape.
pub fn register_all() {
    Lazy::force(&INGESTION_RUNS_TOTAL);
    Lazy::force(&INGESTION_FAILURES_TOTAL);
    Lazy::force(&PRODUCTS_INGESTED_TOTAL);
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
