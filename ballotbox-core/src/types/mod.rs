//! Domain types for ballotbox.
//!
//! - [`ContentHash`]: validated IPFS content identifier
//! - [`CandidatePayload`]: the JSON document pinned per candidate
//! - [`PinMetadata`], [`PinOptions`], [`PinResponse`]: Pinata wire types
//! - [`MediaKind`]: what a gateway says a media hash points at

mod candidate;
mod hash;
mod pin;

pub use candidate::*;
pub use hash::*;
pub use pin::*;
