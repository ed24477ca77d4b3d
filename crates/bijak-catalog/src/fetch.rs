//! # Remote Catalog Fetch
//!
//! The fetcher seam. `CatalogSync` talks to a [`CatalogFetcher`] trait so
//! tests can inject canned bodies and failures without a network;
//! production uses [`HttpFetcher`] over reqwest.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

/// Fetches the raw CSV body for a catalog source identifier.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError>;
}

/// HTTPS fetcher for published spreadsheet CSV exports.
///
/// The source identifier is the sheet id; the export URL is derived from
/// it. Non-2xx responses are fetch failures, handled (and recovered) by
/// the synchronizer.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a bounded request timeout. A hanging fetch
    /// must not hold the catalog refresh open indefinitely.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        HttpFetcher { client }
    }

    /// CSV export URL for a sheet id.
    fn export_url(source_id: &str) -> String {
        format!("https://docs.google.com/spreadsheets/d/{source_id}/export?format=csv")
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogFetcher for HttpFetcher {
    async fn fetch(&self, source_id: &str) -> Result<String, FetchError> {
        let url = Self::export_url(source_id);
        debug!(url = %url, "Fetching remote catalog");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}
