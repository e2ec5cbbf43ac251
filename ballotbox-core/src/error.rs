//! Error types for ballotbox.
//!
//! One enum covers the whole data layer. Fetch and remove paths turn these
//! into safe defaults before they reach callers; the store path exposes them
//! through `try_store`.

use thiserror::Error;

/// Result type alias using `BallotError`.
pub type Result<T> = std::result::Result<T, BallotError>;

/// Main error type for all ballotbox operations.
#[derive(Debug, Error)]
pub enum BallotError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// String is not a supported content identifier. Never reaches the network.
    #[error("Invalid content hash: {0}")]
    InvalidHashFormat(String),

    /// Caller passed no payload, bytes, or ballot.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSPORT & REMOTE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Endpoint unreachable, connection reset, or timed out.
    #[error("Network failure talking to {endpoint}: {reason}")]
    NetworkFailure {
        /// URL that was being called
        endpoint: String,
        /// Transport error message
        reason: String,
    },

    /// Endpoint answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    RemoteError {
        /// URL that was called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Body could not be parsed or lacked an expected field.
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        /// URL that was called
        endpoint: String,
        /// Parse error message
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // ELECTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Candidate metadata could not be pinned.
    #[error("Failed to store candidate data: {0}")]
    StoreFailed(String),

    /// Election contract call failed.
    #[error("Election contract call failed: {0}")]
    ContractError(String),

    /// No candidate with this ID in the election.
    #[error("Candidate not found: {0}")]
    CandidateNotFound(u64),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION & CONFIG
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl BallotError {
    /// Builds a `NetworkFailure` from any displayable transport error.
    pub fn network(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        BallotError::NetworkFailure {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds a `MalformedResponse` from any displayable parse error.
    pub fn malformed(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        BallotError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if retrying the same call could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BallotError::NetworkFailure { .. } => true,
            BallotError::RemoteError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if the error came from a remote endpoint rather than local checks.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            BallotError::NetworkFailure { .. }
                | BallotError::RemoteError { .. }
                | BallotError::MalformedResponse { .. }
        )
    }

    /// Returns true if this is a local validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            BallotError::InvalidHashFormat(_) | BallotError::EmptyInput(_)
        )
    }
}
