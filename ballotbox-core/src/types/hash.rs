//! Content hash validation.
//!
//! Two shapes are accepted:
//!
//! ```text
//! CIDv0: "Qm" + 44 × [1-9A-Za-z]          (46 chars, case-sensitive)
//! CIDv1: "b"  + 58 × [A-Za-z2-7]          (59 chars, base32 either case)
//! ```
//!
//! `ipfs://` and `/ipfs/` prefixes are stripped before matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CID_URI_PREFIXES, CID_V0_LEN, CID_V0_PREFIX, CID_V1_LEN, CID_V1_PREFIX};
use crate::error::{BallotError, Result};

/// Returns true if `raw` is a supported content hash.
///
/// Total over all inputs: empty or malformed strings are simply `false`.
pub fn is_valid_hash(raw: &str) -> bool {
    let hash = strip_uri_prefix(raw);
    is_cid_v0(hash) || is_cid_v1(hash)
}

/// Strips a leading `ipfs://` or `/ipfs/`. Whitespace is left alone, so a
/// padded hash fails validation.
pub fn strip_uri_prefix(raw: &str) -> &str {
    CID_URI_PREFIXES
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .unwrap_or(raw)
}

fn is_cid_v0(s: &str) -> bool {
    s.len() == CID_V0_LEN
        && s.starts_with(CID_V0_PREFIX)
        && s.as_bytes()[CID_V0_PREFIX.len()..]
            .iter()
            .all(|b| matches!(b, b'1'..=b'9' | b'A'..=b'Z' | b'a'..=b'z'))
}

fn is_cid_v1(s: &str) -> bool {
    s.len() == CID_V1_LEN
        && s.starts_with(CID_V1_PREFIX)
        && s.as_bytes()[1..]
            .iter()
            .all(|b| matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'2'..=b'7'))
}

/// CID version of a validated hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CidVersion {
    /// Base58btc, always starts with `Qm`.
    V0,
    /// Base32 multibase, starts with `b`.
    V1,
}

/// A validated content identifier.
///
/// Always holds the bare hash (no scheme prefix). Serializes as a plain
/// string; deserializing runs the same validation as [`ContentHash::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Validates and normalizes a raw hash or `ipfs://` URI.
    pub fn parse(raw: &str) -> Result<Self> {
        let hash = strip_uri_prefix(raw);
        if is_cid_v0(hash) || is_cid_v1(hash) {
            Ok(Self(hash.to_string()))
        } else {
            Err(BallotError::InvalidHashFormat(format!(
                "'{}' is neither a 46-char CIDv0 nor a 59-char base32 CIDv1",
                raw
            )))
        }
    }

    /// Returns the bare hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the CID version.
    pub fn version(&self) -> CidVersion {
        if self.0.starts_with(CID_V0_PREFIX) {
            CidVersion::V0
        } else {
            CidVersion::V1
        }
    }

    /// Formats the hash as an `ipfs://` URI.
    pub fn to_uri(&self) -> String {
        format!("ipfs://{}", self.0)
    }

    /// Consumes the hash, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContentHash {
    type Err = BallotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = BallotError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}
