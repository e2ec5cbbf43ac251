//! Candidate types.

use serde::{Deserialize, Serialize};

use crate::constants::{PLACEHOLDER_CANDIDATE_NAME, PLACEHOLDER_DESCRIPTION};
use crate::error::{BallotError, Result};

/// Candidate metadata pinned to IPFS.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePayload {
    /// Display name
    pub name: String,
    /// Free-form platform text
    pub description: String,
}

impl CandidatePayload {
    /// Creates a payload.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Placeholder rendered when the real metadata cannot be fetched.
    pub fn unavailable() -> Self {
        Self::new(PLACEHOLDER_CANDIDATE_NAME, PLACEHOLDER_DESCRIPTION)
    }

    /// Returns true if this is the placeholder payload.
    pub fn is_placeholder(&self) -> bool {
        *self == Self::unavailable()
    }

    /// Rejects payloads with a blank name.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BallotError::EmptyInput("candidate name".into()));
        }
        Ok(())
    }
}

/// Candidate index assigned by the election contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate as the election contract reports it.
///
/// Hashes are kept as the raw strings stored on-chain; they are validated
/// when used, not when read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Contract-assigned ID
    pub id: CandidateId,
    /// Name as written on-chain
    pub name: String,
    /// Hash of the pinned [`CandidatePayload`]
    pub description_hash: String,
    /// Hash of the candidate's image or video, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_placeholder() {
        let p = CandidatePayload::unavailable();
        assert_eq!(p.name, "Candidate");
        assert_eq!(p.description, "Description unavailable");
        assert!(p.is_placeholder());
        assert!(!CandidatePayload::new("Alice", "Platform text").is_placeholder());
    }

    #[test]
    fn test_validate_blank_name() {
        assert!(CandidatePayload::new("  ", "text").validate().is_err());
        assert!(CandidatePayload::new("Alice", "").validate().is_ok());
    }

    #[test]
    fn test_payload_json_shape() {
        let json = serde_json::to_value(CandidatePayload::new("Alice", "Platform text")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Alice", "description": "Platform text" }));
    }

    #[test]
    fn test_record_skips_missing_media() {
        let record = CandidateRecord {
            id: CandidateId(3),
            name: "Bob".into(),
            description_hash: "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".into(),
            media_hash: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert!(json.get("media_hash").is_none());
    }
}
