//! Configuration for gateways, pinning and caching.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ballotbox_cache::CacheConfig;
use ballotbox_core::constants::{
    DEFAULT_FALLBACK_GATEWAY_URL, DEFAULT_GATEWAY_URL, DEFAULT_PINATA_API_URL, DEFAULT_TIMEOUT_SECS,
};
use ballotbox_core::error::{BallotError, Result};

/// IPFS client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// Primary read gateway (e.g. "https://gateway.pinata.cloud")
    pub gateway_url: String,
    /// Gateways tried in order after the primary fails
    pub fallback_gateways: Vec<String>,
    /// Pinata API base URL
    pub api_url: String,
    /// Pinata JWT; never serialized or printed
    #[serde(default, skip_serializing)]
    pub pinata_jwt: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.into(),
            fallback_gateways: vec![DEFAULT_FALLBACK_GATEWAY_URL.into()],
            api_url: DEFAULT_PINATA_API_URL.into(),
            pinata_jwt: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for IpfsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpfsConfig")
            .field("gateway_url", &self.gateway_url)
            .field("fallback_gateways", &self.fallback_gateways)
            .field("api_url", &self.api_url)
            .field("pinata_jwt", &self.pinata_jwt.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl IpfsConfig {
    /// Adds the Pinata JWT used for pin and unpin calls.
    pub fn with_pinata_jwt(mut self, jwt: impl Into<String>) -> Self {
        self.pinata_jwt = Some(jwt.into());
        self
    }

    /// Replaces the gateway chain.
    pub fn with_gateways(mut self, primary: impl Into<String>, fallbacks: Vec<String>) -> Self {
        self.gateway_url = primary.into();
        self.fallback_gateways = fallbacks;
        self
    }

    /// Points pinning calls at a different API base.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Primary followed by fallbacks, in the order they are tried.
    pub fn gateway_chain(&self) -> Vec<String> {
        std::iter::once(self.gateway_url.clone())
            .chain(self.fallback_gateways.iter().cloned())
            .filter(|g| !g.trim().is_empty())
            .collect()
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Reads `IPFS_GATEWAY_URL`, `IPFS_FALLBACK_GATEWAYS`, `PINATA_API_URL`,
    /// `PINATA_JWT` and `IPFS_TIMEOUT_SECONDS`, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Ok(Self {
            gateway_url: std::env::var("IPFS_GATEWAY_URL").unwrap_or(defaults.gateway_url),
            fallback_gateways: std::env::var("IPFS_FALLBACK_GATEWAYS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.fallback_gateways),
            api_url: std::env::var("PINATA_API_URL").unwrap_or(defaults.api_url),
            pinata_jwt: std::env::var("PINATA_JWT").ok().filter(|v| !v.is_empty()),
            timeout_seconds: env_u64("IPFS_TIMEOUT_SECONDS")?.unwrap_or(defaults.timeout_seconds),
        })
    }
}

/// Everything a [`ContentStore`](crate::ContentStore) needs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Gateway and pinning settings
    pub ipfs: IpfsConfig,
    /// Cache TTL, capacity and sweep period
    pub cache: CacheConfig,
}

impl StoreConfig {
    /// Reads [`IpfsConfig::from_env`] plus `CACHE_TTL_SECONDS`,
    /// `CACHE_MAX_ENTRIES` and `CACHE_SWEEP_INTERVAL_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let ipfs = IpfsConfig::from_env()?;
        let defaults = CacheConfig::default();

        let cache = CacheConfig {
            max_entries: env_u64("CACHE_MAX_ENTRIES")?
                .map(|v| v as usize)
                .unwrap_or(defaults.max_entries),
            ttl_seconds: env_u64("CACHE_TTL_SECONDS")?.unwrap_or(defaults.ttl_seconds),
            sweep_interval_seconds: env_u64("CACHE_SWEEP_INTERVAL_SECONDS")?
                .unwrap_or(defaults.sweep_interval_seconds),
        };

        Ok(Self { ipfs, cache })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| BallotError::ConfigError(format!("{} must be an integer: {}", key, e))),
        Err(_) => Ok(None),
    }
}
