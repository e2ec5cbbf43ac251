//! Ordered gateway chain for reads.
//!
//! Every gateway is tried with the same success test (2xx status, then a
//! parseable body); the first success wins.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use ballotbox_core::error::{BallotError, Result};
use ballotbox_core::types::{ContentHash, MediaKind};

/// Longest slice of an error body kept in logs and errors.
const MAX_ERROR_BODY: usize = 256;

/// Read-only IPFS gateways, tried in order.
#[derive(Clone, Debug)]
pub struct GatewayChain {
    gateways: Vec<String>,
    http_client: reqwest::Client,
}

impl GatewayChain {
    /// Creates a chain; bare hostnames get an `https://` scheme.
    pub fn new(gateways: Vec<String>, http_client: reqwest::Client) -> Self {
        let gateways = gateways
            .into_iter()
            .map(|g| {
                let base = g.trim().trim_end_matches('/');
                if base.starts_with("http://") || base.starts_with("https://") {
                    base.to_string()
                } else {
                    format!("https://{}", base)
                }
            })
            .collect();

        Self {
            gateways,
            http_client,
        }
    }

    /// Gateways in the order they are tried.
    pub fn gateways(&self) -> &[String] {
        &self.gateways
    }

    /// URL of `hash` on `gateway`.
    pub fn url_for(gateway: &str, hash: &ContentHash) -> String {
        format!("{}/ipfs/{}", gateway, hash)
    }

    /// Fetches a JSON document, falling through the chain on any failure.
    ///
    /// Returns the last gateway's error when every gateway fails.
    #[instrument(skip(self), fields(hash = %hash))]
    pub async fn fetch_json(&self, hash: &ContentHash) -> Result<Value> {
        let mut last_error = None;

        for (position, gateway) in self.gateways.iter().enumerate() {
            match self.fetch_from_gateway(gateway, hash).await {
                Ok(value) => {
                    if position > 0 {
                        debug!(gateway, "Fetched from fallback gateway");
                    } else {
                        debug!(gateway, "Fetched from primary gateway");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!(gateway, error = %e, "Gateway fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BallotError::ConfigError("no IPFS gateways configured".into())
        }))
    }

    async fn fetch_from_gateway(&self, gateway: &str, hash: &ContentHash) -> Result<Value> {
        let url = Self::url_for(gateway, hash);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| BallotError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BallotError::RemoteError {
                endpoint: url,
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BallotError::malformed(&url, e))
    }

    /// Asks the chain what kind of media `hash` points at.
    ///
    /// Only headers are read; the body is dropped unread.
    #[instrument(skip(self), fields(hash = %hash))]
    pub async fn probe_media(&self, hash: &ContentHash) -> Result<MediaKind> {
        let mut last_error = None;

        for gateway in &self.gateways {
            let url = Self::url_for(gateway, hash);
            let response = match self.http_client.get(&url).send().await {
                Ok(r) => r,
                Err(e) => {
                    warn!(gateway, error = %e, "Media probe failed");
                    last_error = Some(BallotError::network(&url, e));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                warn!(gateway, status = status.as_u16(), "Media not found on gateway");
                last_error = Some(BallotError::RemoteError {
                    endpoint: url,
                    status: status.as_u16(),
                    body: String::new(),
                });
                continue;
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            let kind = MediaKind::from_content_type(content_type);
            debug!(gateway, ?kind, "Probed media");
            return Ok(kind);
        }

        Err(last_error.unwrap_or_else(|| {
            BallotError::ConfigError("no IPFS gateways configured".into())
        }))
    }
}

pub(crate) fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
