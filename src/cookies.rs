//! Cookies: [`CookieJar`], snapshots and [`SnapshotStore`] backends.

mod cookie_jar;
mod entry;
mod merge;
mod ordering;
mod persistent_cookie_jar;
mod public_suffix;
mod snapshot;
mod store;

pub use cookie_jar::CookieJar;
pub use cookie_jar::CookieJarHandle;

pub use entry::canonical_host;
pub use entry::Entry;
pub use entry::EntryBuilder;
pub use entry::Identity;
pub use entry::SameSite;

pub use merge::MergeStats;
pub use ordering::{canonical_cmp, sort_canonical};

pub use public_suffix::LastLabelSuffixList;
pub use public_suffix::PublicSuffixList;
pub use public_suffix::PublicSuffixListHandle;

pub use snapshot::{DecodeOutcome, Snapshot};

pub use persistent_cookie_jar::PersistentCookieJar;
pub use store::InMemorySnapshotStore;
pub use store::JsonSnapshotStore;
pub use store::SnapshotStore;
pub use store::SnapshotStoreHandle;
