use anyhow::Context;

use crate::cookies::store::SnapshotStoreHandle;
use crate::cookies::{CookieJarHandle, DecodeOutcome, Entry, Identity};

/// A `CookieJar` decorator that persists changes after each mutation.
///
/// This type is *transparent* for reads (use [`PersistentCookieJar::jar`]) but
/// *eagerly* persists after writes.
pub struct PersistentCookieJar {
    /// Inner cookie jar that holds the actual cookie state.
    inner: CookieJarHandle,
    /// Handle to the snapshot store responsible for persistence.
    store_handle: SnapshotStoreHandle,
}

impl PersistentCookieJar {
    /// Creates a new persistence-enabled wrapper around an existing jar.
    ///
    /// Nothing is loaded; call [`PersistentCookieJar::load`] or use
    /// [`PersistentCookieJar::open`].
    pub fn new(jar: CookieJarHandle, store_handle: SnapshotStoreHandle) -> Self {
        Self {
            inner: jar,
            store_handle,
        }
    }

    /// Wraps `jar` and loads whatever the store holds into it.
    pub fn open(jar: CookieJarHandle, store_handle: SnapshotStoreHandle) -> anyhow::Result<Self> {
        let this = Self::new(jar, store_handle);
        this.load()?;
        Ok(this)
    }

    pub fn jar(&self) -> &CookieJarHandle {
        &self.inner
    }

    /// Decodes the stored snapshot into the jar.
    ///
    /// A store without a snapshot yields [`DecodeOutcome::Empty`].
    pub fn load(&self) -> anyhow::Result<DecodeOutcome> {
        let Some(bytes) = self.store_handle.load().context("load cookie snapshot")? else {
            return Ok(DecodeOutcome::Empty);
        };

        let outcome = self.inner.decode(&bytes).context("decode cookie snapshot")?;
        log::info!("Loaded cookie snapshot: {outcome:?}");
        Ok(outcome)
    }

    /// Encodes the jar and writes the snapshot to the store.
    pub fn save(&self) -> anyhow::Result<()> {
        let snapshot = self.inner.encode().context("encode cookie snapshot")?;
        self.store_handle.save(&snapshot).context("save cookie snapshot")
    }

    /// Stores `entry`, then persists the updated state.
    pub fn set_entry(&self, entry: Entry) -> Option<Entry> {
        let previous = self.inner.set_entry(entry);
        self.persist();
        previous
    }

    /// Removes a single cookie, then persists the updated state.
    pub fn remove_entry(&self, identity: &Identity) -> Option<Entry> {
        let removed = self.inner.remove_entry(identity);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    /// Removes all cookies for `host`, then persists the updated state.
    pub fn remove_host(&self, host: &str) -> anyhow::Result<usize> {
        let removed = self.inner.remove_host(host)?;
        if removed > 0 {
            self.persist();
        }
        Ok(removed)
    }

    /// Clears all cookies in the jar, then persists the updated state.
    pub fn clear(&self) {
        self.inner.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            log::error!("Failed to persist cookie jar: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use time::macros::datetime;

    use super::*;
    use crate::cookies::{CookieJar, InMemorySnapshotStore, JsonSnapshotStore, MergeStats, SnapshotStore};

    fn persistent(host: &str, name: &str) -> Entry {
        Entry::builder(host, name, "v")
            .created_at(datetime!(2025-01-01 00:00 UTC))
            .expires_at(datetime!(2030-01-01 00:00 UTC))
            .build()
            .unwrap()
    }

    #[test]
    fn open_with_empty_store() {
        let store = InMemorySnapshotStore::new();
        let jar = PersistentCookieJar::open(Arc::new(CookieJar::default()), store).unwrap();
        assert!(jar.jar().is_empty());
    }

    #[test]
    fn mutations_are_persisted() {
        let store = InMemorySnapshotStore::new();
        let jar = PersistentCookieJar::new(Arc::new(CookieJar::default()), store.clone());

        jar.set_entry(persistent("example.com", "a"));
        let saved = store.load().unwrap().unwrap();
        assert!(String::from_utf8(saved).unwrap().contains("\"name\":\"a\""));

        let id = persistent("example.com", "a").identity();
        assert!(jar.remove_entry(&id).is_some());
        assert_eq!(store.load().unwrap().as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn reopen_restores_cookies() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cookies.json");

        {
            let jar = PersistentCookieJar::new(Arc::new(CookieJar::default()), JsonSnapshotStore::new(path.clone()));
            jar.set_entry(persistent("example.com", "a"));
            jar.set_entry(persistent("example.org", "b"));
        }

        let reopened = PersistentCookieJar::open(Arc::new(CookieJar::default()), JsonSnapshotStore::new(path)).unwrap();
        assert_eq!(reopened.jar().len(), 2);
        assert_eq!(reopened.jar().get(&persistent("example.org", "b").identity()).unwrap().value(), "v");
    }

    #[test]
    fn load_merges_into_live_cookies() {
        let source = CookieJar::default();
        source.set_entry(persistent("example.com", "a"));
        let store = InMemorySnapshotStore::with_snapshot(source.encode().unwrap());

        let live = Arc::new(CookieJar::default());
        live.set_entry(persistent("example.org", "b"));
        let jar = PersistentCookieJar::new(live, store);

        let outcome = jar.load().unwrap();
        assert_eq!(
            outcome,
            DecodeOutcome::Merged(MergeStats {
                inserted: 1,
                replaced: 0,
                kept: 0
            })
        );
        assert_eq!(jar.jar().len(), 2);
    }

    #[test]
    fn corrupt_snapshot_fails_to_open() {
        let store = InMemorySnapshotStore::with_snapshot(b"not json at all".to_vec());
        let err = PersistentCookieJar::open(Arc::new(CookieJar::default()), store)
            .err()
            .unwrap();

        let cause = err.downcast_ref::<crate::errors::CookieError>().unwrap();
        assert!(cause.is_malformed());
    }

    #[test]
    fn clear_persists_empty_snapshot() {
        let store = InMemorySnapshotStore::new();
        let jar = PersistentCookieJar::new(Arc::new(CookieJar::default()), store.clone());
        jar.set_entry(persistent("example.com", "a"));
        assert_eq!(jar.remove_host("EXAMPLE.com.").unwrap(), 1);

        jar.set_entry(persistent("example.com", "a"));
        jar.clear();
        assert!(jar.jar().is_empty());
        assert_eq!(store.load().unwrap().as_deref(), Some(&b"[]"[..]));
    }
}
