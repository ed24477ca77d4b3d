//! # Bijak Session
//!
//! The draft invoice lifecycle: a guarded state machine that owns the one
//! live draft, auto-saves every mutation, and drives finalization through
//! the layout engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Draft Lifecycle                              │
//! │                                                                     │
//! │  CustomerPending ──select──▶ ItemsEditing ◀──close──┐               │
//! │        ▲                        │    │              │               │
//! │        │ change_customer        │    └──open──▶ ItemEditingForm     │
//! │        └────────────────────────┤                                   │
//! │                                 │ request_finalize                  │
//! │                                 ▼                                   │
//! │                           ReadyToShare ──delivered──▶ Finalized     │
//! │                                                          │          │
//! │                             CustomerPending ◀───reset────┘          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use session::{DeliveryOutcome, DraftSession, SessionState};
