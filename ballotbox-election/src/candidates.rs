//! Candidate workflows: metadata goes to IPFS, hashes go to the contract.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use ballotbox_core::error::{BallotError, Result};
use ballotbox_core::traits::ElectionContract;
use ballotbox_core::types::{CandidateId, CandidatePayload, CandidateRecord, ContentHash};
use ballotbox_ipfs::ContentStore;

/// An image or video to pin alongside a candidate.
#[derive(Clone, Debug)]
pub struct MediaUpload {
    /// Raw file contents
    pub data: Vec<u8>,
    /// Original file name
    pub file_name: String,
    /// MIME type, e.g. "image/png"
    pub content_type: String,
}

impl MediaUpload {
    /// Creates an upload.
    pub fn new(
        data: Vec<u8>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            data,
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }
}

/// Outcome of removing a candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalReport {
    /// The record the contract removed
    pub candidate: CandidateRecord,
    /// Whether every pin belonging to the candidate was released
    pub storage_released: bool,
}

/// Adds, removes, describes and votes for candidates.
pub struct CandidateManager<C> {
    store: Arc<ContentStore>,
    contract: Arc<C>,
}

impl<C: ElectionContract> CandidateManager<C> {
    /// Creates a manager over a shared store and contract.
    pub fn new(store: Arc<ContentStore>, contract: Arc<C>) -> Self {
        Self { store, contract }
    }

    /// The content store.
    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    /// The election contract.
    pub fn contract(&self) -> &Arc<C> {
        &self.contract
    }

    /// Pins the candidate's metadata (and media, if given) and registers
    /// them with the contract.
    ///
    /// A failed media upload is logged and the candidate is added without
    /// media. If the contract call fails, the fresh pins are released.
    #[instrument(skip(self, description, media), fields(has_media = media.is_some()))]
    pub async fn add_candidate(
        &self,
        name: &str,
        description: &str,
        media: Option<MediaUpload>,
    ) -> Result<CandidateId> {
        let payload = CandidatePayload::new(name, description);
        payload.validate()?;

        let media_hash = match media {
            Some(m) => match self
                .store
                .upload_media(m.data, &m.file_name, &m.content_type)
                .await
            {
                Ok(hash) => Some(hash),
                Err(e) => {
                    warn!(file_name = %m.file_name, error = %e, "Media upload failed, adding candidate without media");
                    None
                }
            },
            None => None,
        };

        let description_hash = self
            .store
            .try_store(&serde_json::to_value(&payload)?)
            .await
            .map_err(|e| match e {
                BallotError::EmptyInput(what) => BallotError::EmptyInput(what),
                other => BallotError::StoreFailed(other.to_string()),
            })?;

        let added = self
            .contract
            .add_candidate(
                name,
                description_hash.as_str(),
                media_hash.as_ref().map(ContentHash::as_str),
            )
            .await;

        match added {
            Ok(id) => {
                info!(%id, %description_hash, "Candidate added");
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "Contract rejected candidate, releasing pins");
                self.store.remove(description_hash.as_str()).await;
                if let Some(hash) = &media_hash {
                    self.store.remove(hash.as_str()).await;
                }
                Err(e)
            }
        }
    }

    /// Removes a candidate from the contract, then releases the pins the
    /// removed record points at.
    ///
    /// Contract errors propagate. Storage cleanup is best-effort: a failure
    /// only shows up as `storage_released == false`.
    #[instrument(skip(self))]
    pub async fn remove_candidate(&self, id: CandidateId) -> Result<RemovalReport> {
        let candidate = self.contract.remove_candidate(id).await?;

        let mut storage_released = self.store.remove(&candidate.description_hash).await;
        if let Some(media_hash) = &candidate.media_hash {
            storage_released &= self.store.remove(media_hash).await;
        }

        if storage_released {
            info!(%id, "Candidate removed");
        } else {
            warn!(
                %id,
                description_hash = %candidate.description_hash,
                "Candidate removed but IPFS data was not released"
            );
        }

        Ok(RemovalReport {
            candidate,
            storage_released,
        })
    }

    /// Casts a ranked ballot.
    pub async fn vote(&self, ranking: &[CandidateId]) -> Result<()> {
        if ranking.is_empty() {
            return Err(BallotError::EmptyInput("ballot".into()));
        }
        self.contract.user_vote(ranking).await
    }

    /// Fetches a candidate's metadata, or the placeholder if unavailable.
    pub async fn describe(&self, record: &CandidateRecord) -> CandidatePayload {
        self.store.fetch_candidate(&record.description_hash).await
    }

    /// Every candidate with its metadata, fetched concurrently.
    pub async fn roster(&self) -> Result<Vec<(CandidateRecord, CandidatePayload)>> {
        let records = self.contract.candidates().await?;
        let payloads = join_all(records.iter().map(|r| self.describe(r))).await;
        Ok(records.into_iter().zip(payloads).collect())
    }
}
