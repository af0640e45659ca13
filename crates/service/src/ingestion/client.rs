use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::domain::{ContentItem, EntriesResponse};
use super::errors::IngestionError;
use configs::{
    IngestionConfig, ACCESS_TOKEN_PLACEHOLDER, CONTENT_TYPE_PLACEHOLDER, ENVIRONMENT_PLACEHOLDER, SPACE_ID_PLACEHOLDER,
};

/// Source of product entries created at or after a given instant.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<ContentItem>, IngestionError>;
}

/// Substitute the four placeholder tokens in the configured URL template.
pub fn build_base_url(cfg: &IngestionConfig) -> String {
    cfg.url_template
        .replace(SPACE_ID_PLACEHOLDER, &cfg.space_id)
        .replace(ENVIRONMENT_PLACEHOLDER, &cfg.environment)
        .replace(ACCESS_TOKEN_PLACEHOLDER, &cfg.access_token)
        .replace(CONTENT_TYPE_PLACEHOLDER, &cfg.content_type)
}

/// `2024-01-23T21:47:00.000Z`
pub fn format_since(since: DateTime<Utc>) -> String {
    since.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reqwest-backed client for the delivery API.
pub struct HttpContentSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpContentSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, IngestionError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.into() })
    }

    pub fn from_config(cfg: &IngestionConfig) -> Result<Self, IngestionError> {
        if cfg.url_template.trim().is_empty() {
            return Err(IngestionError::Config("url_template is empty".into()));
        }
        Self::new(build_base_url(cfg), Duration::from_secs(cfg.request_timeout_secs))
    }

    /// Base URL with the `sys.createdAt[gte]` filter appended.
    pub fn request_url(&self, since: DateTime<Utc>) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}sys.createdAt[gte]={}", self.base_url, sep, format_since(since))
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_since(&self, since: DateTime<Utc>) -> Result<Vec<ContentItem>, IngestionError> {
        let url = self.request_url(since);
        debug!(since = %format_since(since), "content_api_request");
        let body: EntriesResponse = self.http.get(url).send().await?.error_for_status()?.json().await?;
        Ok(body.items)
    }
}
