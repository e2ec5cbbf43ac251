//! Cached content store: fetch, store and remove candidate data.
//!
//! Fetch and remove never return errors to the caller; they fall back to a
//! default or `false` and log what went wrong. Store reports failure as
//! `None`, with [`ContentStore::try_store`] available when the cause matters.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use ballotbox_cache::{ContentCache, JanitorHandle};
use ballotbox_core::error::{BallotError, Result};
use ballotbox_core::types::{CandidatePayload, ContentHash, MediaKind, PinMetadata};

use crate::config::StoreConfig;
use crate::flight::{InFlight, Role};
use crate::gateway::GatewayChain;
use crate::pinata::PinataClient;

/// IPFS data access with a TTL cache in front of the gateways.
///
/// One instance per process; share it behind an `Arc`. The cache is owned
/// here and handed to nothing else except the janitor.
pub struct ContentStore {
    cache: Arc<ContentCache>,
    gateways: GatewayChain,
    pinata: PinataClient,
    flights: Arc<InFlight>,
    sweep_interval: Duration,
}

impl ContentStore {
    /// Creates a store with a fresh cache.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let cache = Arc::new(ContentCache::with_config(&config.cache));
        Self::with_cache(config, cache)
    }

    /// Creates a store from the environment (see [`StoreConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(StoreConfig::from_env()?)
    }

    /// Creates a store around an existing cache.
    pub fn with_cache(config: StoreConfig, cache: Arc<ContentCache>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.ipfs.timeout())
            .build()
            .map_err(|e| BallotError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        let gateways = GatewayChain::new(config.ipfs.gateway_chain(), http_client.clone());
        let pinata = PinataClient::new(
            &config.ipfs.api_url,
            config.ipfs.pinata_jwt.clone(),
            http_client,
        );

        Ok(Self {
            cache,
            gateways,
            pinata,
            flights: InFlight::new(),
            sweep_interval: config.cache.sweep_interval(),
        })
    }

    /// The payload cache.
    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    /// The read gateways.
    pub fn gateways(&self) -> &GatewayChain {
        &self.gateways
    }

    /// The pinning client.
    pub fn pinata(&self) -> &PinataClient {
        &self.pinata
    }

    /// Starts the periodic sweep. Keep the handle for as long as the store
    /// lives; dropping or shutting it down stops the task.
    pub fn start_janitor(&self) -> JanitorHandle {
        info!(interval = ?self.sweep_interval, "Starting cache janitor");
        JanitorHandle::start(Arc::clone(&self.cache), self.sweep_interval)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FETCH
    // ═══════════════════════════════════════════════════════════════════════

    /// Resolves `hash` to its JSON payload, or `fallback` on any failure.
    ///
    /// Invalid hashes return `fallback` without touching the network. A
    /// payload that does not decode as `T` also yields `fallback`.
    pub async fn fetch<T>(&self, hash: &str, fallback: T) -> T
    where
        T: DeserializeOwned,
    {
        let value = match self.fetch_value(hash).await {
            Ok(value) => value,
            Err(BallotError::InvalidHashFormat(_)) => {
                warn!(hash, "Invalid IPFS hash format");
                return fallback;
            }
            Err(e) => {
                error!(hash, error = %e, "Error fetching from IPFS, using fallback");
                return fallback;
            }
        };

        match serde_json::from_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(hash, error = %e, "IPFS payload has unexpected shape, using fallback");
                fallback
            }
        }
    }

    /// Resolves `hash` to its JSON payload, surfacing why it failed.
    #[instrument(skip(self))]
    pub async fn fetch_value(&self, hash: &str) -> Result<Value> {
        let hash = ContentHash::parse(hash)?;

        if let Some(hit) = self.cache.get(&hash) {
            debug!(%hash, "Cache hit");
            return Ok(hit);
        }

        let guard = match self.flights.join(&hash) {
            Role::Leader(guard) => guard,
            Role::Follower(rx) => {
                debug!(%hash, "Joining in-flight fetch");
                return rx.await.unwrap_or_else(|_| {
                    Err(BallotError::InternalError(format!(
                        "in-flight fetch of {} was abandoned",
                        hash
                    )))
                });
            }
        };

        // A leader that finished between our cache check and join already filled it
        let outcome = match self.cache.get(&hash) {
            Some(hit) => Ok(hit),
            None => {
                debug!(%hash, "Cache miss, fetching");
                let outcome = self.gateways.fetch_json(&hash).await;
                if let Ok(value) = &outcome {
                    self.cache.put(hash.clone(), value.clone());
                }
                outcome
            }
        };

        let waiters = guard.complete(&outcome);
        if waiters > 0 {
            debug!(%hash, waiters, "Shared fetch result");
        }
        outcome
    }

    /// Fetches a candidate's metadata, using the placeholder on failure.
    pub async fn fetch_candidate(&self, hash: &str) -> CandidatePayload {
        self.fetch(hash, CandidatePayload::unavailable()).await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STORE
    // ═══════════════════════════════════════════════════════════════════════

    /// Pins `payload` and returns its hash, or `None` if anything failed.
    ///
    /// On success the cache already holds `payload`, so an immediate fetch
    /// of the returned hash makes no network call.
    pub async fn store(&self, payload: &Value) -> Option<ContentHash> {
        match self.try_store(payload).await {
            Ok(hash) => Some(hash),
            Err(BallotError::EmptyInput(what)) => {
                error!(what, "Cannot store empty data on IPFS");
                None
            }
            Err(e) => {
                error!(error = %e, "Error storing data on IPFS");
                None
            }
        }
    }

    /// Pins `payload`, returning the error kind on failure.
    #[instrument(skip(self, payload))]
    pub async fn try_store(&self, payload: &Value) -> Result<ContentHash> {
        if is_empty_payload(payload) {
            return Err(BallotError::EmptyInput("payload".into()));
        }

        let metadata = PinMetadata::election_data(Utc::now());
        let pinned = self.pinata.pin_json(payload, metadata).await?;

        let hash = ContentHash::parse(&pinned.ipfs_hash).map_err(|e| {
            error!(returned = %pinned.ipfs_hash, "Invalid IPFS hash returned from Pinata");
            e
        })?;

        self.cache.put(hash.clone(), payload.clone());
        info!(%hash, size = pinned.pin_size, "Stored data on IPFS");
        Ok(hash)
    }

    /// Pins a candidate's metadata.
    pub async fn store_candidate(&self, candidate: &CandidatePayload) -> Option<ContentHash> {
        match serde_json::to_value(candidate) {
            Ok(value) => self.store(&value).await,
            Err(e) => {
                error!(error = %e, "Failed to encode candidate payload");
                None
            }
        }
    }

    /// Uploads a media file and returns its validated hash.
    pub async fn upload_media(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<ContentHash> {
        let pinned = self.pinata.pin_file(data, file_name, content_type).await?;
        ContentHash::parse(&pinned.ipfs_hash)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // REMOVE
    // ═══════════════════════════════════════════════════════════════════════

    /// Unpins `hash` and drops it from the cache.
    ///
    /// The cache entry goes first, whatever happens remotely. Returns true
    /// once the unpin call got any HTTP answer, false if the hash was
    /// invalid or the call never completed.
    #[instrument(skip(self))]
    pub async fn remove(&self, hash: &str) -> bool {
        let hash = match ContentHash::parse(hash) {
            Ok(hash) => hash,
            Err(_) => {
                warn!(hash, "Invalid IPFS hash format for removal");
                return false;
            }
        };

        if self.cache.evict(&hash) {
            debug!(%hash, "Evicted from cache");
        }

        match self.pinata.unpin(&hash).await {
            Ok(()) => true,
            Err(e) => {
                error!(%hash, error = %e, "Error removing data from IPFS");
                false
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MEDIA
    // ═══════════════════════════════════════════════════════════════════════

    /// Reports whether `hash` is an image, a video, or something else.
    pub async fn probe_media(&self, hash: &str) -> Result<MediaKind> {
        let hash = ContentHash::parse(hash)?;
        self.gateways.probe_media(&hash).await
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
