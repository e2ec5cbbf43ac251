//! Common traits for ballotbox.
//!
//! The election itself lives in a smart contract; this crate only needs the
//! three calls the frontend makes against it, keyed by content hashes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CandidateId, CandidateRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// ELECTION CONTRACT TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to an election contract.
///
/// Implementations might use:
/// - An in-memory election (development, tests)
/// - An RPC-backed contract binding (production)
#[async_trait]
pub trait ElectionContract: Send + Sync {
    /// Registers a candidate whose metadata is pinned at `description_hash`.
    ///
    /// Returns the contract-assigned ID.
    async fn add_candidate(
        &self,
        name: &str,
        description_hash: &str,
        media_hash: Option<&str>,
    ) -> Result<CandidateId>;

    /// Removes a candidate, returning the record as it was.
    async fn remove_candidate(&self, id: CandidateId) -> Result<CandidateRecord>;

    /// Casts one ballot; `ranking` lists candidate IDs in preference order.
    async fn user_vote(&self, ranking: &[CandidateId]) -> Result<()>;

    /// Lists the current candidates.
    async fn candidates(&self) -> Result<Vec<CandidateRecord>>;
}
