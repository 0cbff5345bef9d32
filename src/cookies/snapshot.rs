//! Cookie snapshots.
//!
//! A snapshot is the JSON image of (part of) a jar. Two layouts exist:
//!
//! - **flat**: `[ record, ... ]`, the persistent cookies in canonical order. This
//!   is what [`CookieJar::encode`](crate::cookies::CookieJar::encode) writes, and
//!   what older versions of the jar wrote. Decoding merges it into the live jar.
//! - **host-grouped**: `{ host: { cookie key: record } }`, the same nesting as the
//!   live store. Decoding replaces the live store with it.
//!
//! The decoder figures out the layout by itself. Empty input is fine and means
//! "nothing saved yet"; anything else that is not one of the two layouts fails
//! with [`CookieError::MalformedSnapshot`](crate::errors::CookieError::MalformedSnapshot).
mod decode;
mod encode;
mod record;

pub use decode::{DecodeOutcome, Snapshot};
