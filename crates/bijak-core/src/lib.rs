//! # bijak-core: Pure Business Logic for Bijak
//!
//! This crate contains all invoice business logic as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Bijak Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                UI layer (external collaborator)                 │   │
//! │  │     customer picker ──► item form ──► preview ──► share         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   bijak-session (draft lifecycle)   bijak-catalog (products)    │   │
//! │  └─────────────┬──────────────────────────────────┬────────────────┘   │
//! │                │                                  │                     │
//! │  ┌─────────────▼─────────────┐     ┌──────────────▼────────────────┐   │
//! │  │  ★ bijak-core (THIS) ★    │     │   bijak-store (SQLite K/V)    │   │
//! │  │  types • money •          │     └───────────────────────────────┘   │
//! │  │  validation • errors      │                                          │
//! │  │  NO I/O • PURE FUNCTIONS  │                                          │
//! │  └───────────────────────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Invoice, LineItem, Customer, Product, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Line-item input validation
//!
//! ## Design Principles
//!
//! 1. **Snapshot by copy**: a line item freezes name/price/unit at entry
//!    time; later product edits never leak into an agreed invoice.
//! 2. **Integer money**: all monetary values are cents (i64). The single
//!    float boundary is [`Money::from_decimal`] for user/CSV input.
//! 3. **Explicit errors**: all errors are typed, never strings or panics.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a line-item or product name.
///
/// Long enough for any real product description; the PDF layout wraps
/// within its column, so this only guards against pathological input.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a unit label ("kg", "liter", "dozen", ...).
pub const MAX_UNIT_LEN: usize = 30;
