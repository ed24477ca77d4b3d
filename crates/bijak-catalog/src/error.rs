//! # Catalog Fetch Errors
//!
//! `FetchError` is internal to this crate: `CatalogSync::get_all_products`
//! recovers from every variant (cache fallback or empty remote list) and
//! never lets one cross its public boundary. The type exists so the
//! fetcher seam and the fallback logging stay precise.

use thiserror::Error;

/// Remote catalog fetch failures.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS, TLS, timeout, connection refused).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("Fetch failed with HTTP status {0}")]
    Status(u16),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
