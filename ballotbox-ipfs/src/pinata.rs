//! Pinata pinning API client.
//!
//! Uses the v1 pinning endpoints with JWT Bearer auth. A missing JWT is not
//! checked locally; Pinata's 401 comes back as a `RemoteError`.

use chrono::Utc;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use ballotbox_core::error::{BallotError, Result};
use ballotbox_core::types::{ContentHash, PinJsonRequest, PinMetadata, PinOptions, PinResponse};

use crate::gateway::truncate;

/// Pinata client for pin, file upload and unpin.
#[derive(Clone)]
pub struct PinataClient {
    api_url: String,
    jwt: Option<String>,
    http_client: reqwest::Client,
}

impl PinataClient {
    /// Creates a client against `api_url` (e.g. "https://api.pinata.cloud").
    pub fn new(api_url: &str, jwt: Option<String>, http_client: reqwest::Client) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            jwt,
            http_client,
        }
    }

    /// Endpoint for JSON pins.
    pub fn pin_json_url(&self) -> String {
        format!("{}/pinning/pinJSONToIPFS", self.api_url)
    }

    /// Endpoint for file pins.
    pub fn pin_file_url(&self) -> String {
        format!("{}/pinning/pinFileToIPFS", self.api_url)
    }

    /// Endpoint for unpinning `hash`.
    pub fn unpin_url(&self, hash: &ContentHash) -> String {
        format!("{}/pinning/unpin/{}", self.api_url, hash)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.jwt {
            Some(jwt) => request.bearer_auth(jwt),
            None => request,
        }
    }

    /// Pins a JSON document.
    ///
    /// The returned hash is not validated here.
    #[instrument(skip(self, content, metadata), fields(pin_name = %metadata.name))]
    pub async fn pin_json(&self, content: &Value, metadata: PinMetadata) -> Result<PinResponse> {
        if self.jwt.is_none() {
            debug!("No Pinata JWT configured, request will be unauthenticated");
        }

        let url = self.pin_json_url();
        let body = PinJsonRequest {
            pinata_content: content,
            pinata_metadata: metadata,
        };

        let request = self.authorized(self.http_client.post(&url)).json(&body);
        let response = request
            .send()
            .await
            .map_err(|e| BallotError::network(&url, e))?;

        Self::read_pin_response(&url, response).await
    }

    /// Uploads raw bytes (candidate images, videos) as a file pin.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn pin_file(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<PinResponse> {
        if data.is_empty() {
            return Err(BallotError::EmptyInput("file contents".into()));
        }

        let content_type = if content_type.contains('/') {
            content_type
        } else {
            "application/octet-stream"
        };
        let metadata = PinMetadata::for_file(file_name, content_type, data.len(), Utc::now());

        let file_part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| {
                BallotError::InternalError(format!("invalid content type '{}': {}", content_type, e))
            })?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("pinataMetadata", serde_json::to_string(&metadata)?)
            .text("pinataOptions", serde_json::to_string(&PinOptions::default())?);

        let url = self.pin_file_url();
        let response = self
            .authorized(self.http_client.post(&url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| BallotError::network(&url, e))?;

        let pinned = Self::read_pin_response(&url, response).await?;
        debug!(cid = %pinned.ipfs_hash, file_name, "Uploaded file to IPFS");
        Ok(pinned)
    }

    /// Releases a pin.
    ///
    /// Any HTTP answer counts as done; only transport failures are errors.
    #[instrument(skip(self), fields(hash = %hash))]
    pub async fn unpin(&self, hash: &ContentHash) -> Result<()> {
        let url = self.unpin_url(hash);

        let response = self
            .authorized(self.http_client.delete(&url))
            .send()
            .await
            .map_err(|e| BallotError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), error = %truncate(&text), "Failed to unpin");
        } else {
            debug!("Unpinned from Pinata");
        }

        Ok(())
    }

    async fn read_pin_response(url: &str, response: reqwest::Response) -> Result<PinResponse> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BallotError::network(url, e))?;

        if !status.is_success() {
            return Err(BallotError::RemoteError {
                endpoint: url.to_string(),
                status: status.as_u16(),
                body: truncate(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| BallotError::malformed(url, e))
    }
}

impl std::fmt::Debug for PinataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataClient")
            .field("api_url", &self.api_url)
            .field("authenticated", &self.jwt.is_some())
            .finish()
    }
}
