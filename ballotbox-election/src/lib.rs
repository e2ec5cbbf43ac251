//! Candidate workflows for ballotbox.
//!
//! [`CandidateManager`] pairs an [`ElectionContract`] with a
//! [`ContentStore`]: candidate metadata is pinned to IPFS and only its hash
//! goes on-chain. [`MemoryElection`] is an in-process contract for
//! development and tests.
//!
//! [`ElectionContract`]: ballotbox_core::ElectionContract
//! [`ContentStore`]: ballotbox_ipfs::ContentStore

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod candidates;
mod memory;

pub use candidates::{CandidateManager, MediaUpload, RemovalReport};
pub use memory::{ElectionStats, MemoryElection};
