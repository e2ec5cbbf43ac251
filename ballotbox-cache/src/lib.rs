//! TTL cache for payloads fetched from or pinned to IPFS.
//!
//! Entries expire lazily on read; a janitor task reclaims memory in the
//! background.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod janitor;

pub use cache::{CacheConfig, CacheStats, ContentCache};
pub use janitor::{spawn_janitor, JanitorHandle};
