//! The live cookie store.
//!
//! A [`CookieJar`] keeps every cookie of one browsing profile in memory, bucketed
//! by canonical host:
//!
//! ```text
//! canonical host -> (cookie key -> Entry)
//! ```
//!
//! where the cookie key is `"{domain};{path};{name}"` (see [`Entry::cookie_key`]).
//!
//! ## Concurrency
//! The whole store sits behind **one** `RwLock`. Snapshots need a consistent view
//! across all hosts, and decoding a host-grouped snapshot swaps every bucket at
//! once, so per-host locking would not buy anything here. Share a jar through a
//! [`CookieJarHandle`] (`Arc<CookieJar>`); all methods take `&self`.
//!
//! Matching cookies against request URLs and expiring them are handled by the
//! network layer, not here.
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::JarConfig;
use crate::cookies::entry::canonical_host;
use crate::cookies::ordering::sort_canonical;
use crate::cookies::{Entry, Identity, PublicSuffixListHandle};
use crate::errors::CookieError;

/// Reference-counted handle to a jar shared between threads.
pub type CookieJarHandle = Arc<CookieJar>;

/// Host buckets: canonical host -> (cookie key -> entry).
pub(crate) type HostBuckets = HashMap<String, HashMap<String, Entry>>;

/// Backing structure of a jar.
///
/// A store is never built without a suffix list, so every store that replaces
/// the live one carries the jar's configured list.
#[derive(Debug)]
pub(crate) struct Store {
    pub(crate) entries: HostBuckets,
    psl: PublicSuffixListHandle,
}

impl Store {
    pub(crate) fn new(entries: HostBuckets, psl: PublicSuffixListHandle) -> Self {
        Self { entries, psl }
    }

    pub(crate) fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.entries
            .entry(entry.canonical_host().to_string())
            .or_default()
            .insert(entry.cookie_key(), entry)
    }

    fn remove(&mut self, identity: &Identity) -> Option<Entry> {
        let bucket = self.entries.get_mut(&identity.canonical_host)?;
        let removed = bucket.remove(&identity.cookie_key());
        if bucket.is_empty() {
            self.entries.remove(&identity.canonical_host);
        }
        removed
    }

    fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }
}

/// In-memory cookie store for a single profile.
#[derive(Debug)]
pub struct CookieJar {
    config: JarConfig,
    store: RwLock<Store>,
}

impl Default for CookieJar {
    fn default() -> Self {
        Self::new(JarConfig::default())
    }
}

impl CookieJar {
    /// Creates an empty jar using `config`.
    pub fn new(config: JarConfig) -> Self {
        let store = Store::new(HostBuckets::new(), Arc::clone(&config.public_suffix_list));
        Self {
            config,
            store: RwLock::new(store),
        }
    }

    pub fn config(&self) -> &JarConfig {
        &self.config
    }

    // A panicking writer can only stop between two map operations, which leaves
    // the buckets consistent, so a poisoned lock is still safe to use.
    pub(crate) fn read_store(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write_store(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `entry`, replacing any entry with the same identity ("last write wins").
    ///
    /// Returns the replaced entry, if any.
    pub fn set_entry(&self, entry: Entry) -> Option<Entry> {
        self.write_store().insert(entry)
    }

    pub fn get(&self, identity: &Identity) -> Option<Entry> {
        let store = self.read_store();
        store.entries.get(&identity.canonical_host)?.get(&identity.cookie_key()).cloned()
    }

    /// Removes the entry with `identity`.
    pub fn remove_entry(&self, identity: &Identity) -> Option<Entry> {
        self.write_store().remove(identity)
    }

    /// Removes every entry stored for `host`. Returns how many were removed.
    pub fn remove_host(&self, host: &str) -> Result<usize, CookieError> {
        let host = canonical_host(host)?;
        let removed = self.write_store().entries.remove(&host);
        Ok(removed.map_or(0, |bucket| bucket.len()))
    }

    /// Removes all cookies from the jar.
    pub fn clear(&self) {
        self.write_store().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.read_store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every entry (session and persistent) in canonical order.
    ///
    /// This is primarily intended for diagnostics/inspection.
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = {
            let store = self.read_store();
            store.entries.values().flat_map(|bucket| bucket.values().cloned()).collect()
        };
        sort_canonical(&mut entries);
        entries
    }

    /// Collects the persistent entries in canonical order.
    ///
    /// The lock is held while collecting and ordering, and released on return.
    pub fn persistent_entries(&self) -> Vec<Entry> {
        let store = self.read_store();
        let mut entries: Vec<Entry> = store
            .entries
            .values()
            .flat_map(|bucket| bucket.values())
            .filter(|e| e.persistent())
            .cloned()
            .collect();
        sort_canonical(&mut entries);
        entries
    }

    /// Suffix list attached to the current store.
    pub fn public_suffix_list(&self) -> PublicSuffixListHandle {
        Arc::clone(&self.read_store().psl)
    }

    /// Registrable domain (eTLD+1) of `host`, according to the attached suffix list.
    pub fn registrable_domain(&self, host: &str) -> Result<String, CookieError> {
        let host = canonical_host(host)?;
        Ok(self.public_suffix_list().registrable_domain(&host))
    }

    /// Swaps the whole backing structure for `entries`.
    ///
    /// The new store gets the configured suffix list attached before it becomes visible.
    pub(crate) fn replace_entries(&self, entries: HostBuckets) {
        let store = Store::new(entries, Arc::clone(&self.config.public_suffix_list));
        *self.write_store() = store;
    }
}
