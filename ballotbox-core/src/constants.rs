//! Constants for ballotbox.
//!
//! CID shapes follow the two forms Pinata hands back: base58btc CIDv0 and
//! base32 CIDv1. Timings match the frontend's cache behaviour.

// ═══════════════════════════════════════════════════════════════════════════════
// CONTENT IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Prefix of every CIDv0 (sha2-256 multihash in base58btc).
pub const CID_V0_PREFIX: &str = "Qm";

/// Total length of a CIDv0 string.
pub const CID_V0_LEN: usize = 46;

/// Multibase prefix of a base32 CIDv1.
pub const CID_V1_PREFIX: char = 'b';

/// Total length of a base32 CIDv1 string (dag-pb / raw, sha2-256).
pub const CID_V1_LEN: usize = 59;

/// Scheme prefixes stripped before validation.
pub const CID_URI_PREFIXES: &[&str] = &["ipfs://", "/ipfs/"];

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE TIMINGS
// ═══════════════════════════════════════════════════════════════════════════════

/// How long a cached payload is trusted.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 10 * 60;

/// How often the janitor sweeps expired entries.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Upper bound on cached payloads.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// REMOTE ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Primary read gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.pinata.cloud";

/// Gateway tried when the primary fails.
pub const DEFAULT_FALLBACK_GATEWAY_URL: &str = "https://ipfs.io";

/// Pinata pinning API base.
pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";

/// Request timeout for gateway and pinning calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Label prefix attached to every JSON pin.
pub const PIN_NAME_PREFIX: &str = "Election Data";

// ═══════════════════════════════════════════════════════════════════════════════
// PLACEHOLDERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Name shown when a candidate's metadata cannot be loaded.
pub const PLACEHOLDER_CANDIDATE_NAME: &str = "Candidate";

/// Description shown when a candidate's metadata cannot be loaded.
pub const PLACEHOLDER_DESCRIPTION: &str = "Description unavailable";
