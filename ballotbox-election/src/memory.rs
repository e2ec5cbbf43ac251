//! In-memory election contract.
//!
//! Thread-safe stand-in for the on-chain contract, suitable for development,
//! testing, and single-process demos.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use ballotbox_core::error::{BallotError, Result};
use ballotbox_core::traits::ElectionContract;
use ballotbox_core::types::{CandidateId, CandidateRecord};

/// Counters for an in-memory election.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionStats {
    /// Candidates ever added
    pub candidates_added: u64,
    /// Candidates removed
    pub candidates_removed: u64,
    /// Ballots accepted
    pub ballots_cast: u64,
}

/// In-memory election contract.
///
/// Candidate IDs start at 1 and are never reused. Ballots are ranked lists;
/// each accepted ballot counts once toward its first choice.
#[derive(Debug)]
pub struct MemoryElection {
    /// ID → candidate
    candidates: DashMap<u64, CandidateRecord>,
    /// ID → first-preference votes
    first_choices: DashMap<u64, u64>,
    /// Every accepted ballot, in arrival order
    ballots: RwLock<Vec<Vec<CandidateId>>>,
    next_id: AtomicU64,
    stats: RwLock<ElectionStats>,
}

impl MemoryElection {
    /// Creates an election with no candidates.
    pub fn new() -> Self {
        Self {
            candidates: DashMap::new(),
            first_choices: DashMap::new(),
            ballots: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            stats: RwLock::new(ElectionStats::default()),
        }
    }

    /// Returns the current counters.
    pub fn stats(&self) -> ElectionStats {
        self.stats.read().clone()
    }

    /// Number of candidates standing.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if no candidates are standing.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Looks up one candidate.
    pub fn candidate(&self, id: CandidateId) -> Option<CandidateRecord> {
        self.candidates.get(&id.0).map(|c| c.value().clone())
    }

    /// First-preference votes for `id`.
    pub fn first_choice_votes(&self, id: CandidateId) -> u64 {
        self.first_choices.get(&id.0).map(|v| *v).unwrap_or(0)
    }

    /// All accepted ballots.
    pub fn ballots(&self) -> Vec<Vec<CandidateId>> {
        self.ballots.read().clone()
    }

    fn check_ballot(&self, ranking: &[CandidateId]) -> Result<()> {
        if ranking.is_empty() {
            return Err(BallotError::EmptyInput("ballot".into()));
        }

        let mut seen = HashSet::with_capacity(ranking.len());
        for id in ranking {
            if !self.candidates.contains_key(&id.0) {
                return Err(BallotError::CandidateNotFound(id.0));
            }
            if !seen.insert(*id) {
                return Err(BallotError::ContractError(format!(
                    "candidate {} ranked more than once",
                    id
                )));
            }
        }
        Ok(())
    }
}

impl Default for MemoryElection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ElectionContract for MemoryElection {
    #[instrument(skip(self))]
    async fn add_candidate(
        &self,
        name: &str,
        description_hash: &str,
        media_hash: Option<&str>,
    ) -> Result<CandidateId> {
        if name.trim().is_empty() {
            return Err(BallotError::EmptyInput("candidate name".into()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.candidates.insert(
            id,
            CandidateRecord {
                id: CandidateId(id),
                name: name.to_string(),
                description_hash: description_hash.to_string(),
                media_hash: media_hash.map(str::to_string),
            },
        );
        self.stats.write().candidates_added += 1;

        debug!(id, "Candidate added");
        Ok(CandidateId(id))
    }

    #[instrument(skip(self))]
    async fn remove_candidate(&self, id: CandidateId) -> Result<CandidateRecord> {
        let (_, record) = self
            .candidates
            .remove(&id.0)
            .ok_or(BallotError::CandidateNotFound(id.0))?;
        self.first_choices.remove(&id.0);
        self.stats.write().candidates_removed += 1;

        debug!(%id, "Candidate removed");
        Ok(record)
    }

    #[instrument(skip(self), fields(ranked = ranking.len()))]
    async fn user_vote(&self, ranking: &[CandidateId]) -> Result<()> {
        self.check_ballot(ranking)?;

        // Tally under the candidate's read guard; removal needs the write side
        let first = ranking[0];
        let standing = self
            .candidates
            .get(&first.0)
            .ok_or(BallotError::CandidateNotFound(first.0))?;
        *self.first_choices.entry(first.0).or_insert(0) += 1;
        drop(standing);

        self.ballots.write().push(ranking.to_vec());
        self.stats.write().ballots_cast += 1;

        debug!(first = %ranking[0], "Ballot accepted");
        Ok(())
    }

    async fn candidates(&self) -> Result<Vec<CandidateRecord>> {
        let mut all: Vec<CandidateRecord> = self
            .candidates
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESC: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    #[tokio::test]
    async fn test_add_and_list() {
        let election = MemoryElection::new();
        let a = election.add_candidate("Alice", DESC, None).await.unwrap();
        let b = election
            .add_candidate("Bob", DESC, Some("QmMedia"))
            .await
            .unwrap();

        assert_eq!(a, CandidateId(1));
        assert_eq!(b, CandidateId(2));

        let all = election.candidates().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Alice");
        assert_eq!(all[1].media_hash.as_deref(), Some("QmMedia"));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let election = MemoryElection::new();
        let err = election.add_candidate("  ", DESC, None).await.unwrap_err();
        assert!(matches!(err, BallotError::EmptyInput(_)));
        assert!(election.is_empty());
    }

    #[tokio::test]
    async fn test_remove_candidate() {
        let election = MemoryElection::new();
        let id = election.add_candidate("Alice", DESC, None).await.unwrap();

        let removed = election.remove_candidate(id).await.unwrap();
        assert_eq!(removed.description_hash, DESC);
        assert!(election.candidate(id).is_none());

        let err = election.remove_candidate(id).await.unwrap_err();
        assert!(matches!(err, BallotError::CandidateNotFound(1)));
    }

    #[tokio::test]
    async fn test_ids_not_reused() {
        let election = MemoryElection::new();
        let first = election.add_candidate("Alice", DESC, None).await.unwrap();
        election.remove_candidate(first).await.unwrap();
        let second = election.add_candidate("Bob", DESC, None).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_vote_tallies_first_choice() {
        let election = MemoryElection::new();
        let a = election.add_candidate("Alice", DESC, None).await.unwrap();
        let b = election.add_candidate("Bob", DESC, None).await.unwrap();

        election.user_vote(&[a, b]).await.unwrap();
        election.user_vote(&[b, a]).await.unwrap();
        election.user_vote(&[a]).await.unwrap();

        assert_eq!(election.first_choice_votes(a), 2);
        assert_eq!(election.first_choice_votes(b), 1);
        assert_eq!(election.ballots().len(), 3);
        assert_eq!(election.stats().ballots_cast, 3);
    }

    #[tokio::test]
    async fn test_invalid_ballots_rejected() {
        let election = MemoryElection::new();
        let a = election.add_candidate("Alice", DESC, None).await.unwrap();

        assert!(matches!(
            election.user_vote(&[]).await,
            Err(BallotError::EmptyInput(_))
        ));
        assert!(matches!(
            election.user_vote(&[a, CandidateId(99)]).await,
            Err(BallotError::CandidateNotFound(99))
        ));
        assert!(matches!(
            election.user_vote(&[a, a]).await,
            Err(BallotError::ContractError(_))
        ));
        assert_eq!(election.first_choice_votes(a), 0);
        assert!(election.ballots().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_removal_racing_votes_leaves_no_tally() {
        let election = std::sync::Arc::new(MemoryElection::new());
        let a = election.add_candidate("Alice", DESC, None).await.unwrap();

        let voters: Vec<_> = (0..64)
            .map(|_| {
                let election = election.clone();
                tokio::spawn(async move { election.user_vote(&[a]).await })
            })
            .collect();
        election.remove_candidate(a).await.unwrap();
        for voter in voters {
            let _ = voter.await.unwrap();
        }

        assert_eq!(election.first_choice_votes(a), 0);
        assert!(election.candidate(a).is_none());
    }

    #[test]
    fn test_stats_default() {
        let election = MemoryElection::default();
        assert_eq!(election.stats(), ElectionStats::default());
        assert_eq!(election.len(), 0);
    }
}
