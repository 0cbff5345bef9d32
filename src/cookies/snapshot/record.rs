use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::cookies::{Entry, SameSite};
use crate::errors::CookieError;

/// On-disk form of one cookie.
///
/// Fields marked `#[serde(default)]` were added after the first snapshot format
/// and may be missing in older files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_host: Option<String>,
    pub path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub expiry: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
    pub persistent: bool,
    #[serde(default)]
    pub host_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        EntryRecord {
            name: entry.name().to_string(),
            value: entry.value().to_string(),
            domain: entry.domain().to_string(),
            canonical_host: Some(entry.canonical_host().to_string()),
            path: entry.path().to_string(),
            creation_time: entry.creation_time(),
            expiry: entry.expiry(),
            secure: entry.secure(),
            http_only: entry.http_only(),
            persistent: entry.persistent(),
            host_only: entry.host_only(),
            same_site: entry.same_site(),
        }
    }
}

impl EntryRecord {
    /// Validates the record and turns it into an entry.
    ///
    /// The canonical host comes from the record itself, then from `bucket_host`
    /// (host-grouped snapshots), then from the domain attribute.
    pub(crate) fn into_entry(self, bucket_host: Option<&str>) -> Result<Entry, CookieError> {
        let host = self
            .canonical_host
            .filter(|h| !h.is_empty())
            .or_else(|| bucket_host.map(str::to_string))
            .or_else(|| Some(self.domain.trim_start_matches('.').to_string()))
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CookieError::malformed(format!("cookie {:?} has no host", self.name)))?;

        if self.persistent && self.expiry.is_none() {
            return Err(CookieError::malformed(format!(
                "cookie {:?} is marked persistent but has no expiry",
                self.name
            )));
        }
        // Session cookies never carry an expiry in memory.
        let expiry = if self.persistent { self.expiry } else { None };

        Entry::builder(host, self.name, self.value)
            .domain(self.domain)
            .path(self.path)
            .created_at(self.creation_time)
            .expiry_opt(expiry)
            .secure(self.secure)
            .http_only(self.http_only)
            .same_site_opt(self.same_site)
            .host_only(self.host_only)
            .build()
    }
}
