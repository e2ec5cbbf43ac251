//! Pinata wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::PIN_NAME_PREFIX;

/// Label attached to a pin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinMetadata {
    /// Human-readable pin name
    pub name: String,
    /// String/number key-values Pinata indexes for search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyvalues: Option<Map<String, Value>>,
}

impl PinMetadata {
    /// Timestamped label used for every JSON pin.
    pub fn election_data(at: DateTime<Utc>) -> Self {
        Self {
            name: format!("{} {}", PIN_NAME_PREFIX, at.timestamp_millis()),
            keyvalues: None,
        }
    }

    /// Label for an uploaded file, recording its type, size and upload time.
    pub fn for_file(name: &str, file_type: &str, size: usize, at: DateTime<Utc>) -> Self {
        let mut keyvalues = Map::new();
        keyvalues.insert("fileType".into(), Value::from(file_type));
        keyvalues.insert("size".into(), Value::from(size));
        keyvalues.insert("uploadDate".into(), Value::from(at.to_rfc3339()));
        Self {
            name: name.to_string(),
            keyvalues: Some(keyvalues),
        }
    }
}

/// Options sent with a file pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinOptions {
    /// 0 keeps hashes in the `Qm…` form
    pub cid_version: u8,
    /// Whether Pinata wraps the file in a directory node
    pub wrap_with_directory: bool,
}

impl Default for PinOptions {
    fn default() -> Self {
        Self {
            cid_version: 0,
            wrap_with_directory: false,
        }
    }
}

/// Body of `pinJSONToIPFS`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinJsonRequest<'a> {
    /// The document being pinned
    pub pinata_content: &'a Value,
    /// Its label
    pub pinata_metadata: PinMetadata,
}

/// Response of `pinJSONToIPFS` and `pinFileToIPFS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinResponse {
    /// Hash of the pinned content (not yet validated)
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    /// Size in bytes
    #[serde(rename = "PinSize", default)]
    pub pin_size: u64,
    /// Pin time as reported by Pinata
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    /// Set when the content was already pinned
    #[serde(rename = "isDuplicate", default)]
    pub is_duplicate: bool,
}

/// Media type of a pinned candidate asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content_type", rename_all = "snake_case")]
pub enum MediaKind {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
    /// Anything else, with the reported content type
    Unsupported(String),
}

impl MediaKind {
    /// Classifies a `Content-Type` header value.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let ct = content_type.unwrap_or("").trim().to_ascii_lowercase();
        if ct.starts_with("image/") {
            MediaKind::Image
        } else if ct.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Unsupported(ct)
        }
    }

    /// Returns true for images and videos.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, MediaKind::Unsupported(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_election_data_label() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let meta = PinMetadata::election_data(at);
        assert_eq!(meta.name, "Election Data 1700000000123");
        assert!(meta.keyvalues.is_none());
    }

    #[test]
    fn test_json_request_shape() {
        let content = serde_json::json!({ "name": "Alice", "description": "Platform text" });
        let req = PinJsonRequest {
            pinata_content: &content,
            pinata_metadata: PinMetadata {
                name: "Election Data 1".into(),
                keyvalues: None,
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["pinataContent"]["name"], "Alice");
        assert_eq!(json["pinataMetadata"]["name"], "Election Data 1");
        assert!(json["pinataMetadata"].get("keyvalues").is_none());
    }

    #[test]
    fn test_file_metadata_keyvalues() {
        let at = Utc.timestamp_opt(0, 0).unwrap();
        let meta = PinMetadata::for_file("alice.png", "image/png", 2048, at);
        let kv = meta.keyvalues.unwrap();
        assert_eq!(kv["fileType"], "image/png");
        assert_eq!(kv["size"], 2048);
        assert_eq!(kv["uploadDate"], "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_pin_options_wire_names() {
        let json = serde_json::to_value(PinOptions::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "cidVersion": 0, "wrapWithDirectory": false }));
    }

    #[test]
    fn test_pin_response_minimal() {
        let resp: PinResponse =
            serde_json::from_str(r#"{"IpfsHash":"QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"}"#)
                .unwrap();
        assert_eq!(resp.pin_size, 0);
        assert!(resp.timestamp.is_none());
        assert!(!resp.is_duplicate);
    }

    #[test]
    fn test_media_kind_classification() {
        assert_eq!(MediaKind::from_content_type(Some("image/png")), MediaKind::Image);
        assert_eq!(MediaKind::from_content_type(Some("Video/MP4")), MediaKind::Video);
        assert_eq!(
            MediaKind::from_content_type(Some("application/json")),
            MediaKind::Unsupported("application/json".into())
        );
        assert!(!MediaKind::from_content_type(None).is_renderable());
    }
}
