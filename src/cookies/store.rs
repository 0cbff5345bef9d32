//! Snapshot store infrastructure.
//!
//! A **snapshot store** is the persistence driver for a jar: it owns the actual
//! transport (a file, a buffer, ...) and moves raw snapshot bytes in and out.
//! It never looks inside the bytes; encoding and decoding are done by the
//! [`CookieJar`](crate::cookies::CookieJar).
//!
//! This module exports two reference implementations:
//! - [`JsonSnapshotStore`]: one JSON file on disk, replaced atomically on save.
//! - [`InMemorySnapshotStore`]: bytes kept in memory (tests, private sessions).
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use gosub_cookiejar::cookies::{CookieJar, JsonSnapshotStore, PersistentCookieJar};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = JsonSnapshotStore::new("cookies.json".into());
//! let jar = PersistentCookieJar::open(Arc::new(CookieJar::default()), store)?;
//! jar.save()?;
//! # Ok(()) }
//! ```
mod in_memory;
mod json;

use std::sync::Arc;

/// In-memory snapshot store.
pub use in_memory::InMemorySnapshotStore;
/// File-backed JSON snapshot store.
pub use json::JsonSnapshotStore;

/// A handle to a snapshot store trait.
pub type SnapshotStoreHandle = Arc<dyn SnapshotStore + Send + Sync>;

/// Moves snapshot bytes to and from durable storage.
///
/// Implementations must be `Send + Sync` and safe for concurrent use.
pub trait SnapshotStore: Send + Sync {
    /// Returns the last saved snapshot, or `None` if nothing was saved yet.
    fn load(&self) -> anyhow::Result<Option<Vec<u8>>>;

    /// Replaces the saved snapshot with `snapshot`.
    ///
    /// Readers must either see the previous snapshot or the new one, never a mix.
    fn save(&self, snapshot: &[u8]) -> anyhow::Result<()>;

    /// Removes the saved snapshot. Idempotent.
    fn clear(&self) -> anyhow::Result<()>;
}
