use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::cookies::snapshot::record::EntryRecord;
use crate::cookies::CookieJar;
use crate::errors::CookieError;

impl CookieJar {
    /// Encodes all persistent cookies as a JSON array in canonical order.
    ///
    /// A jar without persistent cookies encodes to `[]`. Encoding the same jar
    /// twice without mutations in between yields identical bytes.
    ///
    /// # Errors
    /// Only fails when serde_json rejects a record, which cannot happen for
    /// entries built through [`Entry::builder`](crate::cookies::Entry::builder).
    pub fn encode(&self) -> Result<Vec<u8>, CookieError> {
        let records = self.persistent_records();
        self.to_json(&records)
    }

    /// Same as [`encode`](Self::encode), but streams the bytes into `writer`.
    ///
    /// The store lock is released before anything is written.
    pub fn encode_to<W: Write>(&self, writer: W) -> Result<(), CookieError> {
        let records = self.persistent_records();
        let written = if self.config().pretty_snapshots {
            serde_json::to_writer_pretty(writer, &records)
        } else {
            serde_json::to_writer(writer, &records)
        };
        written.map_err(CookieError::Encode)
    }

    /// Encodes all persistent cookies in the host-grouped layout
    /// (`{ host: { cookie key: record } }`), hosts and keys in sorted order.
    pub fn encode_grouped(&self) -> Result<Vec<u8>, CookieError> {
        let mut grouped: BTreeMap<String, BTreeMap<String, EntryRecord>> = BTreeMap::new();
        for entry in self.persistent_entries() {
            grouped
                .entry(entry.canonical_host().to_string())
                .or_default()
                .insert(entry.cookie_key(), EntryRecord::from(&entry));
        }
        self.to_json(&grouped)
    }

    fn persistent_records(&self) -> Vec<EntryRecord> {
        self.persistent_entries().iter().map(EntryRecord::from).collect()
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CookieError> {
        let bytes = if self.config().pretty_snapshots {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        bytes.map_err(CookieError::Encode)
    }
}
