//! # bijak-store: Persistence Layer for Bijak
//!
//! A generic key/value abstraction over durable local storage (SQLite).
//! Every other component keeps its records here: customers, local
//! products, the single draft invoice, finalized history, merchant
//! configuration and the catalog cache.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  read(key, default)  → value, or the default on a missing key OR a     │
//! │                        non-deserializable value. Corruption NEVER       │
//! │                        crashes the caller.                              │
//! │  write(key, value)   → awaited upsert; a read in the same logical step  │
//! │                        observes the new value (no visible buffering).   │
//! │  remove(key)         → delete; missing keys are fine.                   │
//! │                                                                         │
//! │  Keys are independent. There are no multi-key transactions; components  │
//! │  must not assume atomic multi-key updates.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`pool`] - `Store` handle, pool creation and configuration
//! - [`keys`] - the logical record keys
//! - [`migrations`] - embedded database migrations
//! - [`error`] - storage error types

pub mod error;
pub mod keys;
pub mod migrations;
pub mod pool;

pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};
