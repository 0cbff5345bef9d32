//! Merging decoded entries into a live jar.
//!
//! The rule per candidate is:
//! - no entry with the same identity: insert the candidate;
//! - an entry exists: replace it only when the candidate was created strictly
//!   later. Equal creation times keep the live entry, which makes merging the
//!   same snapshot twice a no-op.
//!
//! Live entries missing from the candidates are never touched.
use std::collections::hash_map::Entry as MapEntry;

use crate::cookies::cookie_jar::HostBuckets;
use crate::cookies::{CookieJar, Entry};

/// What a merge did to the live store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Candidates with an identity the store did not hold yet.
    pub inserted: usize,
    /// Candidates that were newer than the live entry and replaced it.
    pub replaced: usize,
    /// Candidates that lost against an equally old or newer live entry.
    pub kept: usize,
}

impl MergeStats {
    /// True when the merge left the store unchanged.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.replaced == 0
    }
}

impl CookieJar {
    /// Merges `candidates` into the jar, holding the store lock for the whole sequence.
    pub fn merge(&self, candidates: Vec<Entry>) -> MergeStats {
        let total = candidates.len();
        let stats = {
            let mut store = self.write_store();
            merge_into(&mut store.entries, candidates)
        };

        log::debug!(
            "Merged {total} cookie(s): {} inserted, {} replaced, {} kept",
            stats.inserted,
            stats.replaced,
            stats.kept
        );
        stats
    }
}

/// Applies the merge rule for every candidate, in order.
pub(crate) fn merge_into(buckets: &mut HostBuckets, candidates: Vec<Entry>) -> MergeStats {
    let mut stats = MergeStats::default();

    for candidate in candidates {
        let bucket = buckets.entry(candidate.canonical_host().to_string()).or_default();
        match bucket.entry(candidate.cookie_key()) {
            MapEntry::Vacant(slot) => {
                slot.insert(candidate);
                stats.inserted += 1;
            }
            MapEntry::Occupied(mut slot) => {
                if candidate.creation_time() > slot.get().creation_time() {
                    slot.insert(candidate);
                    stats.replaced += 1;
                } else {
                    stats.kept += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn entry(host: &str, name: &str, value: &str, created: OffsetDateTime) -> Entry {
        Entry::builder(host, name, value)
            .created_at(created)
            .expires_at(datetime!(2030-01-01 0:00 UTC))
            .build()
            .unwrap()
    }

    const T1: OffsetDateTime = datetime!(2025-01-01 0:00 UTC);
    const T2: OffsetDateTime = datetime!(2025-02-01 0:00 UTC);

    #[test]
    fn inserts_unknown_identities() {
        let jar = CookieJar::default();
        let stats = jar.merge(vec![entry("a.example", "x", "1", T1), entry("b.example", "x", "2", T1)]);

        assert_eq!(stats, MergeStats { inserted: 2, replaced: 0, kept: 0 });
        assert_eq!(jar.len(), 2);
    }

    #[test]
    fn newer_candidate_replaces_live_entry() {
        let jar = CookieJar::default();
        jar.set_entry(entry("a.example", "x", "live", T1));

        let stats = jar.merge(vec![entry("a.example", "x", "saved", T2)]);

        assert_eq!(stats.replaced, 1);
        let live = jar.get(&entry("a.example", "x", "", T1).identity()).unwrap();
        assert_eq!(live.value(), "saved");
    }

    #[test]
    fn older_or_equal_candidate_keeps_live_entry() {
        let jar = CookieJar::default();
        jar.set_entry(entry("a.example", "x", "live", T2));

        let stats = jar.merge(vec![entry("a.example", "x", "older", T1), entry("a.example", "x", "same-age", T2)]);

        assert_eq!(stats, MergeStats { inserted: 0, replaced: 0, kept: 2 });
        assert_eq!(jar.entries()[0].value(), "live");
    }

    #[test]
    fn merge_never_removes_live_entries() {
        let jar = CookieJar::default();
        let session = Entry::builder("a.example", "session", "s").created_at(T1).build().unwrap();
        jar.set_entry(session.clone());
        jar.set_entry(entry("c.example", "p", "1", T1));

        jar.merge(vec![entry("b.example", "x", "1", T1)]);

        assert_eq!(jar.len(), 3);
        assert_eq!(jar.get(&session.identity()), Some(session));
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let jar = CookieJar::default();
        jar.set_entry(entry("a.example", "x", "live", T1));
        let candidates = vec![
            entry("a.example", "x", "saved", T2),
            entry("a.example", "x", "stale", T1),
            entry("b.example", "y", "1", T1),
        ];

        jar.merge(candidates.clone());
        let after_first = jar.entries();

        let second = jar.merge(candidates);
        assert!(second.is_noop());
        assert_eq!(jar.entries(), after_first);
    }

    #[test]
    fn duplicate_candidates_keep_the_latest() {
        let jar = CookieJar::default();
        jar.merge(vec![entry("a.example", "x", "new", T2), entry("a.example", "x", "old", T1)]);
        assert_eq!(jar.entries()[0].value(), "new");

        let jar = CookieJar::default();
        jar.merge(vec![entry("a.example", "x", "old", T1), entry("a.example", "x", "new", T2)]);
        assert_eq!(jar.entries()[0].value(), "new");
    }

    #[test]
    fn concurrent_traffic_during_merge_is_preserved() {
        let jar = Arc::new(CookieJar::default());
        let candidates: Vec<Entry> = (0..200).map(|i| entry("saved.example", &format!("c{i}"), "v", T1)).collect();

        let writer = {
            let jar = Arc::clone(&jar);
            thread::spawn(move || {
                for i in 0..200 {
                    jar.set_entry(entry("live.example", &format!("c{i}"), "v", T2));
                }
            })
        };
        jar.merge(candidates);
        writer.join().unwrap();

        assert_eq!(jar.len(), 400);
    }
}
