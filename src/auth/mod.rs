//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionState`: shared auth state read by the view layer
//! - `SessionStore`: the operations that mutate it (signup, login,
//!   logout, check, refresh)
//! - `SnapshotStore`: the single persisted session record
//!
//! The session credential itself is opaque and carried by the HTTP
//! layer; only the identity record is persisted locally.

pub mod session;
pub mod snapshot;

pub use session::{SessionState, SessionStore};
pub use snapshot::{SessionSnapshot, SnapshotStore};
