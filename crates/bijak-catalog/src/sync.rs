//! # Catalog Synchronizer
//!
//! Owns the fetch/cache/merge policy behind `get_all_products`.
//!
//! ## Cache Validity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A CacheEntry is valid iff BOTH hold:                                   │
//! │    • its source_id matches the currently configured source              │
//! │    • its age is under the 5-minute TTL                                  │
//! │                                                                         │
//! │  Changing the configured source invalidates the cache immediately,      │
//! │  regardless of age. A stale entry is still kept around: it is the       │
//! │  fallback when a re-fetch fails.                                        │
//! │                                                                         │
//! │  SLOW-FETCH RULE: a resolved fetch is applied only if the validity      │
//! │  check, re-evaluated when the result lands, still deems it the          │
//! │  freshest data. A slow response never clobbers a newer entry written    │
//! │  by a faster subsequent call.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bijak_core::{MerchantConfig, Product, ProductOrigin};
use bijak_store::{keys, Store, StoreResult};

use crate::csv::parse_catalog_csv;
use crate::fetch::CatalogFetcher;

/// Maximum age in seconds of a cached remote list before a re-fetch is
/// forced (5 minutes).
pub const CACHE_TTL_SECS: i64 = 5 * 60;

// =============================================================================
// Cache Entry
// =============================================================================

/// The last successfully fetched remote product list, with the timestamp
/// and source it was fetched for. Persisted under `keys::CATALOG_CACHE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Parsed remote products, in sheet row order.
    pub products: Vec<Product>,

    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,

    /// The source identifier the fetch was issued against.
    pub source_id: String,
}

impl CacheEntry {
    /// Whether this entry may serve reads for `source_id` right now.
    pub fn is_valid(&self, source_id: &str, now: DateTime<Utc>) -> bool {
        self.source_id == source_id && (now - self.fetched_at).num_seconds() < CACHE_TTL_SECS
    }

    /// Whether this entry may serve as a FALLBACK for `source_id` (same
    /// source, any age).
    fn matches_source(&self, source_id: &str) -> bool {
        self.source_id == source_id
    }
}

// =============================================================================
// Catalog Synchronizer
// =============================================================================

/// Merges the remote catalog (fetched + cached) with locally-entered
/// products. One instance per app; tests construct as many independent
/// instances as they like - all state is the injected store + fetcher.
#[derive(Debug, Clone)]
pub struct CatalogSync<F> {
    store: Store,
    fetcher: F,
}

impl<F: CatalogFetcher> CatalogSync<F> {
    pub fn new(store: Store, fetcher: F) -> Self {
        CatalogSync { store, fetcher }
    }

    /// Returns the combined product list for line-item entry.
    ///
    /// Infallible by contract: every failure path degrades to the best
    /// list available (cache, then local-only).
    pub async fn get_all_products(&self, config: &MerchantConfig) -> Vec<Product> {
        let local = self.local_products().await;

        let Some(source_id) = config.catalog_source() else {
            return local;
        };

        let now = Utc::now();
        let cached: Option<CacheEntry> = self.store.read(keys::CATALOG_CACHE, None).await;

        if let Some(entry) = &cached {
            if entry.is_valid(source_id, now) {
                debug!(source = %source_id, rows = entry.products.len(), "Serving catalog from cache");
                return merge(&entry.products, local);
            }
        }

        let fetch_started = Utc::now();
        match self.fetcher.fetch(source_id).await {
            Ok(body) => {
                let remote = parse_catalog_csv(&body);
                info!(source = %source_id, rows = remote.len(), "Remote catalog fetched");

                // Re-evaluate validity at resolution time: if a faster
                // subsequent call already wrote a newer valid entry for
                // this source, that entry wins over our slow result.
                let current: Option<CacheEntry> = self.store.read(keys::CATALOG_CACHE, None).await;
                if let Some(entry) = current {
                    if entry.is_valid(source_id, Utc::now()) && entry.fetched_at > fetch_started {
                        debug!(source = %source_id, "Newer cache entry landed mid-fetch, keeping it");
                        return merge(&entry.products, local);
                    }
                }

                let entry = CacheEntry {
                    products: remote,
                    fetched_at: Utc::now(),
                    source_id: source_id.to_string(),
                };
                if let Err(e) = self.store.write(keys::CATALOG_CACHE, &entry).await {
                    // The list is still good for this call; only the
                    // cache write is lost.
                    warn!(error = %e, "Failed to persist catalog cache");
                }
                merge(&entry.products, local)
            }
            Err(e) => {
                warn!(source = %source_id, error = %e, "Catalog fetch failed, degrading");
                match cached {
                    Some(entry) if entry.matches_source(source_id) => {
                        merge(&entry.products, local)
                    }
                    _ => merge(&[], local),
                }
            }
        }
    }

    /// Clears the cache unconditionally. The next `get_all_products` call
    /// forces a re-fetch (manual refresh).
    pub async fn invalidate_cache(&self) -> StoreResult<()> {
        info!("Invalidating catalog cache");
        self.store.remove(keys::CATALOG_CACHE).await
    }

    /// Locally-entered products, most-used first.
    async fn local_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS, Vec::new()).await;
        products.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        products
    }
}

// =============================================================================
// Merge
// =============================================================================

/// Remote rows first, in parsed order; local products appended unless a
/// remote row shares the name case-insensitively (remote wins, local is
/// suppressed from the combined list but stays persisted).
fn merge(remote: &[Product], local: Vec<Product>) -> Vec<Product> {
    let remote_names: std::collections::HashSet<String> =
        remote.iter().map(|p| p.name.to_lowercase()).collect();

    let mut combined: Vec<Product> = remote.to_vec();
    combined.extend(
        local
            .into_iter()
            .filter(|p| !remote_names.contains(&p.name.to_lowercase())),
    );
    combined
}

// =============================================================================
// Unit Tests
// =============================================================================
