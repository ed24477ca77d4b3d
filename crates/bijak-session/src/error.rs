//! Session-level errors.
//!
//! Validation, render and store failures are wrapped rather than flattened
//! so callers can tell a field-level input problem from an I/O one. No
//! variant here ever implies the draft was lost; every failing operation
//! leaves the invoice exactly as it was.

use thiserror::Error;

/// Errors surfaced by [`crate::DraftSession`] operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Operation called from a state that does not permit it.
    #[error("Invalid transition: {operation} is not allowed from {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    /// Finalize requested with zero line items.
    #[error("Cannot finalize an invoice with no line items")]
    NoLineItems,

    /// Finalize requested before a customer was selected.
    #[error("Cannot finalize an invoice with no customer")]
    NoCustomer,

    /// Edit named a line item that is not on the invoice.
    #[error("Line item not found: {id}")]
    LineItemNotFound { id: String },

    /// Line-item input rejected before any mutation.
    #[error(transparent)]
    Validation(#[from] bijak_core::ValidationError),

    /// Document generation failed; the draft is preserved for retry.
    #[error("Document generation failed: {0}")]
    Render(#[from] bijak_pdf::RenderError),

    /// Persistence failure on a write path.
    #[error(transparent)]
    Store(#[from] bijak_store::StoreError),

    /// The external share/download collaborator reported a failure. The
    /// rendered document is kept so the user can retry without
    /// regenerating.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
