//! # Render Errors
//!
//! Document generation failures are terminal for the current action only:
//! the session keeps the draft untouched and the user may retry.

use thiserror::Error;

/// Document generation failures.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// The invoice has no line items. The session guards this before
    /// calling the engine; the engine still refuses rather than emitting
    /// an empty table.
    #[error("Cannot render an invoice with no line items")]
    EmptyInvoice,

    /// A single block is taller than a whole page and cannot be placed.
    /// Not reachable with the current name-length limits; kept so the
    /// pagination loop has a typed way out instead of spinning.
    #[error("Block of height {height:.1}pt exceeds the page content area")]
    BlockTooTall { height: f64 },
}
