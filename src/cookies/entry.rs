//! Cookie entries.
//!
//! An [`Entry`] is the unit of storage inside a [`CookieJar`](crate::cookies::CookieJar):
//! one cookie plus the metadata needed to persist and reload it.
//!
//! # Identity
//! Two entries describe the same logical cookie when their
//! `(canonical_host, domain, path, name)` tuples match, see [`Entry::identity`].
//! Everything else (value, flags, expiry) is payload.
//!
//! # Persistence
//! An entry is *persistent* when the server gave it an expiry. There is no
//! separate flag to flip: [`Entry::persistent`] is derived from [`Entry::expiry`].
//!
//! ```rust
//! use gosub_cookiejar::cookies::Entry;
//! use time::macros::datetime;
//!
//! # fn main() -> Result<(), gosub_cookiejar::errors::CookieError> {
//! let entry = Entry::builder("WWW.Example.com:8443", "session", "abc123")
//!     .domain(".example.com")
//!     .path("/account")
//!     .created_at(datetime!(2025-01-01 12:00 UTC))
//!     .expires_at(datetime!(2026-01-01 12:00 UTC))
//!     .secure(true)
//!     .build()?;
//!
//! assert_eq!(entry.canonical_host(), "www.example.com");
//! assert_eq!(entry.cookie_key(), ".example.com;/account;session");
//! assert!(entry.persistent());
//! # Ok(()) }
//! ```
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};
use url::Host;

use crate::errors::CookieError;

/// SameSite policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Identity of a stored cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    pub canonical_host: String,
    pub domain: String,
    pub path: String,
    pub name: String,
}

impl Identity {
    /// Key of the identified entry inside its host bucket.
    pub fn cookie_key(&self) -> String {
        cookie_key(&self.domain, &self.path, &self.name)
    }
}

/// A cookie as kept in the jar.
///
/// `PartialEq` compares identity **and** payload; use [`Entry::same_identity`]
/// when only identity matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    value: String,
    domain: String,
    canonical_host: String,
    path: String,
    creation_time: OffsetDateTime,
    expiry: Option<OffsetDateTime>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
    host_only: bool,
}

impl Entry {
    /// Starts building an entry for a cookie received from `host`.
    ///
    /// `host` may carry a port and a trailing dot; it is canonicalized on
    /// [`EntryBuilder::build`].
    pub fn builder(host: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> EntryBuilder {
        EntryBuilder {
            host: host.into(),
            name: name.into(),
            value: value.into(),
            domain: None,
            path: "/".to_string(),
            creation_time: None,
            expiry: None,
            secure: false,
            http_only: false,
            same_site: None,
            host_only: None,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn value(&self) -> &str { &self.value }
    pub fn domain(&self) -> &str { &self.domain }
    pub fn canonical_host(&self) -> &str { &self.canonical_host }
    pub fn path(&self) -> &str { &self.path }
    pub fn creation_time(&self) -> OffsetDateTime { self.creation_time }
    pub fn expiry(&self) -> Option<OffsetDateTime> { self.expiry }
    pub fn secure(&self) -> bool { self.secure }
    pub fn http_only(&self) -> bool { self.http_only }
    pub fn same_site(&self) -> Option<SameSite> { self.same_site }
    pub fn host_only(&self) -> bool { self.host_only }

    /// True when the cookie should survive a snapshot cycle.
    pub fn persistent(&self) -> bool {
        self.expiry.is_some()
    }

    /// Key of this entry inside its host bucket, derived from domain, path and name.
    pub fn cookie_key(&self) -> String {
        cookie_key(&self.domain, &self.path, &self.name)
    }

    pub fn identity(&self) -> Identity {
        Identity {
            canonical_host: self.canonical_host.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
            name: self.name.clone(),
        }
    }

    /// Compares identity only, ignoring value, flags and expiry.
    pub fn same_identity(&self, other: &Entry) -> bool {
        self.canonical_host == other.canonical_host
            && self.domain == other.domain
            && self.path == other.path
            && self.name == other.name
    }
}

/// Builder for [`Entry`].
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    host: String,
    name: String,
    value: String,
    domain: Option<String>,
    path: String,
    creation_time: Option<OffsetDateTime>,
    expiry: Option<OffsetDateTime>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
    host_only: Option<bool>,
}

impl EntryBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EntryBuilder)) -> Self {
        f(&mut self);
        self
    }

    /// Domain attribute as sent by the server. Without one the cookie is host-only.
    pub fn domain(self, domain: impl Into<String>) -> Self { self.map(|b| b.domain = Some(domain.into())) }
    pub fn path(self, path: impl Into<String>) -> Self { self.map(|b| b.path = path.into()) }
    pub fn created_at(self, t: OffsetDateTime) -> Self { self.map(|b| b.creation_time = Some(t)) }
    pub fn expires_at(self, t: OffsetDateTime) -> Self { self.map(|b| b.expiry = Some(t)) }
    pub fn secure(self, on: bool) -> Self { self.map(|b| b.secure = on) }
    pub fn http_only(self, on: bool) -> Self { self.map(|b| b.http_only = on) }
    pub fn same_site(self, policy: SameSite) -> Self { self.map(|b| b.same_site = Some(policy)) }
    pub fn host_only(self, on: bool) -> Self { self.map(|b| b.host_only = Some(on)) }

    pub(crate) fn expiry_opt(self, t: Option<OffsetDateTime>) -> Self { self.map(|b| b.expiry = t) }
    pub(crate) fn same_site_opt(self, policy: Option<SameSite>) -> Self { self.map(|b| b.same_site = policy) }

    /// Canonicalizes the host, validates timestamps and builds the entry.
    pub fn build(self) -> Result<Entry, CookieError> {
        let canonical_host = canonical_host(&self.host)?;

        let domain = self
            .domain
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let host_only = self.host_only.unwrap_or(domain.is_none());
        let domain = domain.unwrap_or_else(|| canonical_host.clone());

        let creation_time = snapshot_timestamp(self.creation_time.unwrap_or_else(OffsetDateTime::now_utc))?;
        let expiry = self.expiry.map(snapshot_timestamp).transpose()?;

        Ok(Entry {
            name: self.name,
            value: self.value,
            domain,
            canonical_host,
            path: self.path,
            creation_time,
            expiry,
            secure: self.secure,
            http_only: self.http_only,
            same_site: self.same_site,
            host_only,
        })
    }
}

fn cookie_key(domain: &str, path: &str, name: &str) -> String {
    format!("{domain};{path};{name}")
}

/// Normalizes `host` into the form used for bucketing and ordering.
///
/// Ports and trailing dots are removed, domain names are lower-cased and
/// punycode-encoded, IP literals are written in their standard form.
pub fn canonical_host(host: &str) -> Result<String, CookieError> {
    let bare = host_without_port(host.trim());
    let bare = bare.trim_end_matches('.');
    if bare.is_empty() {
        return Err(CookieError::InvalidHost(host.to_string()));
    }

    match Host::parse(bare) {
        Ok(Host::Domain(domain)) => Ok(domain),
        Ok(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Ok(Host::Ipv6(addr)) => Ok(addr.to_string()),
        Err(_) => Err(CookieError::InvalidHost(host.to_string())),
    }
}

fn host_without_port(host: &str) -> String {
    if host.starts_with('[') {
        // "[::1]:8080" -> "[::1]"
        return match host.find(']') {
            Some(end) => host[..=end].to_string(),
            None => host.to_string(),
        };
    }

    if host.matches(':').count() > 1 {
        // Bare IPv6 literal, `Host::parse` wants it bracketed.
        return format!("[{host}]");
    }

    host.split(':').next().unwrap_or(host).to_string()
}

/// RFC 3339 only covers years 0000..=9999.
fn snapshot_timestamp(t: OffsetDateTime) -> Result<OffsetDateTime, CookieError> {
    let t = t
        .checked_to_offset(UtcOffset::UTC)
        .ok_or(CookieError::InvalidTimestamp(t))?;
    if !(0..=9999).contains(&t.year()) {
        return Err(CookieError::InvalidTimestamp(t));
    }
    Ok(t)
}
