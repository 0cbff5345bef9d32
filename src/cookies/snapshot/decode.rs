use serde::Deserialize;
use serde_json::Value;

use crate::cookies::cookie_jar::HostBuckets;
use crate::cookies::merge::{merge_into, MergeStats};
use crate::cookies::snapshot::record::EntryRecord;
use crate::cookies::{CookieJar, Entry};
use crate::errors::CookieError;

/// A parsed snapshot that has not been applied to a jar yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// `[ record, ... ]`, as written by [`CookieJar::encode`]. Merged into the live store.
    Flat(Vec<Entry>),
    /// `{ host: { key: record } }`, a full store image. Replaces the live store.
    Grouped(HostBuckets),
}

/// What [`CookieJar::decode`] did to the jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The input was empty; the jar is unchanged.
    Empty,
    /// A flat snapshot was merged.
    Merged(MergeStats),
    /// A host-grouped snapshot replaced the store.
    Replaced { entries: usize },
}

impl Snapshot {
    /// Parses `bytes` without touching any jar.
    ///
    /// Returns `Ok(None)` for empty (or whitespace-only) input.
    ///
    /// # Errors
    /// [`CookieError::MalformedSnapshot`] when the input is not JSON, or is JSON
    /// that is neither an array of records nor an object of host buckets. An
    /// array or object whose records are all invalid is malformed as well.
    /// Otherwise individual records that fail validation are dropped with a warning.
    pub fn parse(bytes: &[u8]) -> Result<Option<Snapshot>, CookieError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: Value = serde_json::from_slice(bytes).map_err(CookieError::unparsable)?;

        if let Some(entries) = flat_entries(&value) {
            return Ok(Some(Snapshot::Flat(entries)));
        }
        if let Some(buckets) = grouped_entries(&value) {
            return Ok(Some(Snapshot::Grouped(buckets)));
        }

        let found = match value {
            Value::Array(_) | Value::Object(_) => format!("{} without a single valid cookie record", kind_of(&value)),
            _ => kind_of(&value).to_string(),
        };
        Err(CookieError::malformed(format!(
            "expected an array of cookies or an object of hosts, found {found}"
        )))
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        match self {
            Snapshot::Flat(entries) => entries.len(),
            Snapshot::Grouped(buckets) => buckets.values().map(|b| b.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CookieJar {
    /// Loads a snapshot into the jar.
    ///
    /// - empty input: nothing happens;
    /// - flat snapshot: its entries are merged (see [`CookieJar::merge`]);
    /// - host-grouped snapshot: it replaces the store wholesale.
    ///
    /// Parsing happens before the store lock is taken. On error the jar is left
    /// untouched.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodeOutcome, CookieError> {
        let limit = self.config().max_snapshot_bytes;
        if bytes.len() > limit {
            return Err(CookieError::SnapshotTooLarge { size: bytes.len(), limit });
        }

        match Snapshot::parse(bytes)? {
            None => Ok(DecodeOutcome::Empty),
            Some(snapshot) => Ok(self.apply(snapshot)),
        }
    }

    /// Applies an already parsed snapshot.
    pub fn apply(&self, snapshot: Snapshot) -> DecodeOutcome {
        match snapshot {
            Snapshot::Flat(entries) => DecodeOutcome::Merged(self.merge(entries)),
            Snapshot::Grouped(buckets) => {
                let entries = buckets.values().map(|b| b.len()).sum();
                self.replace_entries(buckets);
                log::debug!(
                    "Replaced cookie store with {entries} snapshot entries, suffix list {}",
                    self.config().public_suffix_list.describe()
                );
                DecodeOutcome::Replaced { entries }
            }
        }
    }
}

fn flat_entries(value: &Value) -> Option<Vec<Entry>> {
    let records = value.as_array()?;

    let entries: Vec<Entry> = records
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| match decode_record(raw, None) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Dropping cookie record #{idx} from snapshot: {e}");
                None
            }
        })
        .collect();

    // An array without a single cookie record is not a snapshot.
    if entries.is_empty() && !records.is_empty() {
        return None;
    }
    Some(entries)
}

fn grouped_entries(value: &Value) -> Option<HostBuckets> {
    let hosts = value.as_object()?;
    if !hosts.values().all(Value::is_object) {
        return None;
    }

    let mut candidates = 0;
    let mut entries = Vec::new();
    for (host, cookies) in hosts {
        for (key, raw) in cookies.as_object()? {
            candidates += 1;
            match decode_record(raw, Some(host.as_str())) {
                Ok(entry) => {
                    if entry.cookie_key() != *key || entry.canonical_host() != host.as_str() {
                        log::debug!(
                            "Re-keying cookie {host}/{key} as {}/{}",
                            entry.canonical_host(),
                            entry.cookie_key()
                        );
                    }
                    entries.push(entry);
                }
                Err(e) => log::warn!("Dropping cookie record {host}/{key} from snapshot: {e}"),
            }
        }
    }

    // Replacing the store with nothing but rejected records would wipe it.
    if entries.is_empty() && candidates > 0 {
        return None;
    }

    // Re-keying can make two records collide; the newer one wins, as in a merge.
    let mut buckets = HostBuckets::new();
    merge_into(&mut buckets, entries);
    Some(buckets)
}

fn decode_record(raw: &Value, bucket_host: Option<&str>) -> Result<Entry, CookieError> {
    let record = EntryRecord::deserialize(raw).map_err(|e| CookieError::MalformedSnapshot {
        reason: "invalid cookie record".to_string(),
        source: Some(e),
    })?;
    record.into_entry(bucket_host)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
