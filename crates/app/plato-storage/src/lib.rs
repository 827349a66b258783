//! Local persistence for the update checks.
//!
//! Everything here is a flat string map; the only typed view over it is
//! [`UpdateMarkers`].

mod error;
mod markers;
mod store;

pub use error::{Result, StorageError};
pub use markers::{DISMISSED_VERSION_CODE_KEY, LAST_CHECK_AT_KEY, UpdateMarkers};
pub use store::{FileStore, KeyValueStore, MemoryStore};
