//! JSON-file snapshot store.
//!
//! `JsonSnapshotStore` keeps the jar's snapshot in a single JSON file on disk.
//!
//! ### I/O characteristics & caveats
//! - `save` writes the whole snapshot into a temporary file next to the target
//!   and renames it over the target, so a crash never leaves a half-written file.
//! - A missing file reads as "no snapshot yet".
//! - There is no locking between processes sharing the same file; the last
//!   writer wins.
//!
//! ### Example
//! ```ignore
//! let store = JsonSnapshotStore::new("cookies.json".into());
//! let jar = PersistentCookieJar::open(Arc::new(CookieJar::default()), store)?;
//! ```
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tempfile::NamedTempFile;

use crate::cookies::store::SnapshotStore;

/// A snapshot store backed by one JSON file.
#[derive(Debug)]
pub struct JsonSnapshotStore {
    /// Path to the JSON file where the snapshot is stored.
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Creates a store for `path`. Nothing is touched on disk until the first save.
    pub fn new(path: PathBuf) -> Arc<Self> {
        Arc::new(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> anyhow::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", self.path.display())),
        }
    }

    fn save(&self, snapshot: &[u8]) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir).with_context(|| format!("create temp file in {}", dir.display()))?;
        tmp.write_all(snapshot).context("write cookie snapshot")?;
        tmp.as_file().sync_all().context("sync cookie snapshot")?;
        tmp.persist(&self.path)
            .with_context(|| format!("rename temp file to {}", self.path.display()))?;

        log::debug!("Saved {} byte cookie snapshot to {}", snapshot.len(), self.path.display());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", self.path.display())),
        }
    }
}
