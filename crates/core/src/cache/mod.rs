//! SQLite-backed look-aside cache for query responses.
//!
//! Keys are derived deterministically from the normalized parameter set
//! (see [`key`]); values are serialized JSON payloads stored with a fixed
//! time-to-live. The cache is strictly an optimization: callers hold an
//! `Option<CacheDb>` and every read/write failure degrades to a miss.

pub mod connection;
pub mod entries;
pub mod key;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::CacheStats;
pub use key::{cache_key, canonical_json};
