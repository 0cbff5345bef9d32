//! Cookie jar configuration.
//!
//! `JarConfig` holds the process-wide settings of a [`CookieJar`](crate::cookies::CookieJar):
//! which public suffix list its stores classify domains with, how snapshots are
//! formatted, and how large a snapshot the jar agrees to decode.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_cookiejar::config::JarConfig;
//! let cfg = JarConfig::default();
//! assert!(!cfg.pretty_snapshots);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::sync::Arc;
//! use gosub_cookiejar::config::JarConfig;
//! use gosub_cookiejar::cookies::LastLabelSuffixList;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = JarConfig::builder()
//!     .public_suffix_list(Arc::new(LastLabelSuffixList))
//!     .pretty_snapshots(true)
//!     .max_snapshot_bytes(4 * 1024 * 1024)
//!     .build()?; // returns Result<JarConfig, JarConfigError>
//! # Ok(()) }
//! ```
//!
//! # Fields (summary)
//! - `public_suffix_list`: suffix service attached to every store (default: last-label).
//! - `pretty_snapshots`: write indented JSON (default: `false`).
//! - `max_snapshot_bytes`: decode refuses larger inputs (default: 16 MiB, must be > 0).

use std::fmt;
use std::sync::Arc;

use crate::cookies::{LastLabelSuffixList, PublicSuffixListHandle};

const DEFAULT_MAX_SNAPSHOT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct JarConfig {
    pub public_suffix_list: PublicSuffixListHandle,
    pub pretty_snapshots: bool,
    pub max_snapshot_bytes: usize,
}

impl Default for JarConfig {
    fn default() -> Self {
        Self {
            public_suffix_list: Arc::new(LastLabelSuffixList),
            pretty_snapshots: false,
            max_snapshot_bytes: DEFAULT_MAX_SNAPSHOT_BYTES,
        }
    }
}

impl JarConfig {
    pub fn builder() -> JarConfigBuilder {
        JarConfigBuilder::default()
    }
}

/// Builder for [`JarConfig`].
#[derive(Debug, Clone, Default)]
pub struct JarConfigBuilder {
    inner: JarConfig,
}

impl JarConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut JarConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn public_suffix_list(self, list: PublicSuffixListHandle) -> Self { self.map(|c| c.public_suffix_list = list) }
    pub fn pretty_snapshots(self, on: bool) -> Self { self.map(|c| c.pretty_snapshots = on) }
    pub fn max_snapshot_bytes(self, n: usize) -> Self { self.map(|c| c.max_snapshot_bytes = n) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<JarConfig, JarConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone)]
pub enum JarConfigError {
    ZeroSnapshotLimit,
}

impl fmt::Display for JarConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JarConfigError::ZeroSnapshotLimit =>
                write!(f, "max_snapshot_bytes must be at least 1"),
        }
    }
}
impl std::error::Error for JarConfigError {}

fn validate(c: &JarConfig) -> Result<(), JarConfigError> {
    if c.max_snapshot_bytes == 0 {
        return Err(JarConfigError::ZeroSnapshotLimit);
    }
    Ok(())
}
