//! Canonical ordering of entries.
//!
//! Used only to make snapshots byte-identical for the same logical store. It has
//! nothing to do with the order in which cookies are sent on a request.
use std::cmp::Ordering;

use crate::cookies::Entry;

/// Total order over entries: canonical host ascending, then longer paths
/// first, then older entries first, then domain/path/name.
pub fn canonical_cmp(a: &Entry, b: &Entry) -> Ordering {
    a.canonical_host()
        .cmp(b.canonical_host())
        .then_with(|| b.path().len().cmp(&a.path().len()))
        .then_with(|| a.creation_time().cmp(&b.creation_time()))
        .then_with(|| (a.domain(), a.path(), a.name()).cmp(&(b.domain(), b.path(), b.name())))
}

/// Sorts `entries` in place by [`canonical_cmp`].
pub fn sort_canonical(entries: &mut [Entry]) {
    entries.sort_by(canonical_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn entry(host: &str, path: &str, name: &str) -> Entry {
        Entry::builder(host, name, "v")
            .path(path)
            .created_at(datetime!(2025-01-01 0:00 UTC))
            .build()
            .unwrap()
    }

    fn keys(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| format!("{}{}", e.canonical_host(), e.path())).collect()
    }

    #[test]
    fn host_first_then_longest_path() {
        let mut entries = vec![
            entry("b.example", "/", "x"),
            entry("a.example", "/", "x"),
            entry("a.example", "/very/long", "x"),
            entry("a.example", "/mid", "x"),
        ];
        sort_canonical(&mut entries);

        assert_eq!(keys(&entries), vec!["a.example/very/long", "a.example/mid", "a.example/", "b.example/"]);
    }

    #[test]
    fn ties_resolve_by_creation_then_name() {
        let older = Entry::builder("a.example", "z", "v")
            .path("/p")
            .created_at(datetime!(2024-01-01 0:00 UTC))
            .build()
            .unwrap();
        let b = entry("a.example", "/q", "b");
        let a = entry("a.example", "/q", "a");

        let mut entries = vec![b.clone(), a.clone(), older.clone()];
        sort_canonical(&mut entries);
        assert_eq!(entries, vec![older, a, b]);
    }

    #[test]
    fn order_is_independent_of_input_order() {
        let base = vec![
            entry("c.example", "/", "n"),
            entry("a.example", "/x", "n"),
            entry("a.example", "/", "m"),
            entry("b.example", "/abc", "n"),
        ];
        let mut forward = base.clone();
        let mut backward: Vec<Entry> = base.into_iter().rev().collect();

        sort_canonical(&mut forward);
        sort_canonical(&mut backward);
        assert_eq!(forward, backward);
    }
}
