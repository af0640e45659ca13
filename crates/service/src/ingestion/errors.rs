use thiserror::Error;

use crate::errors::ServiceError;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("invalid ingestion config: {0}")]
    Config(String),
    #[error("content API request failed")]
    Http(#[from] reqwest::Error),
    #[error("failed to persist product")]
    Persistence(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_error_keeps_its_source() {
        let e = anyhow::Error::from(IngestionError::Persistence(ServiceError::Db("connection reset".into())));
        assert_eq!(format!("{e:#}"), "failed to persist product: database error: connection reset");
    }
}
