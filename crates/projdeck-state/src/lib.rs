//! Machine state store: one JSON document per machine in a shared state
//! directory (typically a synced folder; the sync transport is not this
//! crate's concern).
//!
//! Write discipline: a machine only ever writes its own document, and
//! writes it wholesale via temp-file-then-rename. Readers across machines
//! never race a writer on the same document, so no locking is needed.

pub mod error;
mod store;

pub use error::{Error, Result};
pub use store::{LoadedState, StateStore};
