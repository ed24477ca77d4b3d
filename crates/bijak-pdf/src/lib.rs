//! # bijak-pdf: Document Layout Engine for Bijak
//!
//! Renders an [`Invoice`](bijak_core::Invoice) plus a
//! [`MerchantConfig`](bijak_core::MerchantConfig) into a paginated PDF.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   render(invoice, merchant)                                             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   layout  - walks the blocks top to bottom with a vertical cursor;      │
//! │             checks remaining space BEFORE each line-item row and the    │
//! │             totals block, starting a new page when a block won't fit    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   metrics - Helvetica AFM widths; word-wraps text against its column    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   writer  - assembles objects, content streams and the xref table       │
//! │             into final PDF 1.4 bytes                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principle
//! No platform dependencies: no filesystem, no system font discovery, no
//! async runtime. Given the same invoice, the output bytes are identical
//! on every platform, which makes pagination testable byte-for-byte.

pub mod error;
pub mod layout;
pub mod metrics;
pub mod writer;

pub use error::RenderError;
pub use layout::render;
