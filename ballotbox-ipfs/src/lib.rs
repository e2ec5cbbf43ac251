//! IPFS access for ballotbox.
//!
//! Reads go through an ordered gateway chain, writes and unpins go to
//! Pinata, and [`ContentStore`] ties both to a TTL cache.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod flight;
mod gateway;
mod pinata;
mod store;

pub use config::{IpfsConfig, StoreConfig};
pub use gateway::GatewayChain;
pub use pinata::PinataClient;
pub use store::ContentStore;
