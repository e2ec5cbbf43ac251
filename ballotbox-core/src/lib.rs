//! # Ballotbox Core
//!
//! Core types, errors, and traits shared by the ballotbox crates.
//!
//! - **Types**: content hashes, candidate payloads, pin metadata
//! - **Errors**: one error enum covering validation, transport and remote failures
//! - **Constants**: CID shapes, cache timings, Pinata endpoints
//! - **Traits**: the election contract seam
//!
//! ## Example
//!
//! ```rust
//! use ballotbox_core::{is_valid_hash, ContentHash};
//!
//! assert!(is_valid_hash("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"));
//! assert!(!is_valid_hash("not-a-real-hash"));
//!
//! let hash = ContentHash::parse("ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
//! assert_eq!(hash.as_str(), "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{BallotError, Result};
pub use traits::*;
pub use types::*;
