//! # bijak-catalog: Catalog Synchronizer for Bijak
//!
//! Produces THE product list offered during line-item entry, merged from
//! two sources under a time-to-live policy:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      get_all_products(config)                           │
//! │                                                                         │
//! │  no source configured ──► local products, most-used first               │
//! │                                                                         │
//! │  cache valid (same source, age < 5 min)                                 │
//! │          ──► merge(cached remote rows, local)                           │
//! │                                                                         │
//! │  otherwise fetch sheet CSV over HTTPS                                   │
//! │     ├── 2xx ──► parse rows ──► store CacheEntry ──► merge               │
//! │     └── error ──► last cache for this source, else empty remote         │
//! │                                                                         │
//! │  NEVER raises. Callers always receive a usable list.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Merge rule: remote rows first in parsed order; a local product is
//! appended only when no remote row shares its name case-insensitively.
//! Suppressed local products stay persisted under their own identity, so
//! they reappear the moment the remote row disappears.
//!
//! The cache is an explicit [`CacheEntry`] persisted through the store
//! and owned by the [`CatalogSync`] instance - there is no module-level
//! singleton, so tests construct independent synchronizers freely.

pub mod csv;
pub mod error;
pub mod fetch;
pub mod sync;

pub use error::FetchError;
pub use fetch::{CatalogFetcher, HttpFetcher};
pub use sync::{CacheEntry, CatalogSync, CACHE_TTL_SECS};
