//! Candidate workflows against a mocked Pinata API and gateway.

use std::sync::Arc;

use ballotbox_core::types::{CandidateId, CandidatePayload, ContentHash};
use ballotbox_core::{BallotError, ElectionContract};
use ballotbox_election::{CandidateManager, MediaUpload, MemoryElection};
use ballotbox_ipfs::{ContentStore, IpfsConfig, StoreConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DESC_HASH: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
const MEDIA_HASH: &str = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";
const OTHER_HASH: &str = "QmT78zSuBmuS4z925WZfrqQ1qHaJ56DQaTfyMUF7F8ff5o";

async fn manager(gateway: &MockServer, pinata: &MockServer) -> CandidateManager<MemoryElection> {
    let config = StoreConfig {
        ipfs: IpfsConfig::default()
            .with_gateways(gateway.uri(), Vec::new())
            .with_api_url(pinata.uri())
            .with_pinata_jwt("test-jwt"),
        ..Default::default()
    };
    CandidateManager::new(
        Arc::new(ContentStore::new(config).unwrap()),
        Arc::new(MemoryElection::new()),
    )
}

fn hash(raw: &str) -> ContentHash {
    ContentHash::parse(raw).unwrap()
}

async fn mock_pin_json(pinata: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "IpfsHash": DESC_HASH })))
        .mount(pinata)
        .await;
}

#[tokio::test]
async fn test_add_then_describe_uses_cache() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    mock_pin_json(&pinata).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&gateway)
        .await;

    let manager = manager(&gateway, &pinata).await;
    let id = manager
        .add_candidate("Alice", "Platform text", None)
        .await
        .unwrap();

    let record = manager.contract().candidate(id).unwrap();
    assert_eq!(record.description_hash, DESC_HASH);
    assert!(record.media_hash.is_none());

    let payload = manager.describe(&record).await;
    assert_eq!(payload, CandidatePayload::new("Alice", "Platform text"));
}

#[tokio::test]
async fn test_add_with_media() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    mock_pin_json(&pinata).await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "IpfsHash": MEDIA_HASH })))
        .expect(1)
        .mount(&pinata)
        .await;

    let manager = manager(&gateway, &pinata).await;
    let media = MediaUpload::new(vec![1, 2, 3, 4], "alice.jpg", "image/jpeg");
    let id = manager
        .add_candidate("Alice", "Platform text", Some(media))
        .await
        .unwrap();

    let record = manager.contract().candidate(id).unwrap();
    assert_eq!(record.media_hash.as_deref(), Some(MEDIA_HASH));
}

#[tokio::test]
async fn test_media_failure_is_not_fatal() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    mock_pin_json(&pinata).await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinFileToIPFS"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upload failed"))
        .expect(1)
        .mount(&pinata)
        .await;

    let manager = manager(&gateway, &pinata).await;
    let media = MediaUpload::new(vec![1, 2, 3], "alice.mp4", "video/mp4");
    let id = manager
        .add_candidate("Alice", "Platform text", Some(media))
        .await
        .unwrap();

    assert!(manager.contract().candidate(id).unwrap().media_hash.is_none());
}

#[tokio::test]
async fn test_rejected_pin_adds_nothing() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pinning/pinJSONToIPFS"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&pinata)
        .await;

    let manager = manager(&gateway, &pinata).await;
    let err = manager
        .add_candidate("Alice", "Platform text", None)
        .await
        .unwrap_err();

    assert!(matches!(err, BallotError::StoreFailed(_)));
    assert!(manager.contract().is_empty());
}

#[tokio::test]
async fn test_remove_releases_storage() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    mock_pin_json(&pinata).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/pinning/unpin/{}", DESC_HASH)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&pinata)
        .await;

    let manager = manager(&gateway, &pinata).await;
    let id = manager
        .add_candidate("Alice", "Platform text", None)
        .await
        .unwrap();

    let report = manager.remove_candidate(id).await.unwrap();
    assert_eq!(report.candidate.name, "Alice");
    assert!(report.storage_released);
    assert!(manager.contract().is_empty());
    assert!(manager.store().cache().is_empty());
}

#[tokio::test]
async fn test_remove_with_invalid_hash_still_removes_candidate() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&pinata)
        .await;

    let manager = manager(&gateway, &pinata).await;
    let id = manager
        .contract()
        .add_candidate("Alice", "corrupted", None)
        .await
        .unwrap();

    let report = manager.remove_candidate(id).await.unwrap();
    assert_eq!(report.candidate.description_hash, "corrupted");
    assert!(!report.storage_released);
    assert!(manager.contract().is_empty());
}

#[tokio::test]
async fn test_remove_unpins_only_the_removed_record() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/pinning/unpin/{}", DESC_HASH)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&pinata)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/pinning/unpin/{}", MEDIA_HASH)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&pinata)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/pinning/unpin/{}", OTHER_HASH)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&pinata)
        .await;

    let manager = manager(&gateway, &pinata).await;
    let contract = manager.contract();
    let alice = contract
        .add_candidate("Alice", DESC_HASH, Some(MEDIA_HASH))
        .await
        .unwrap();
    contract.add_candidate("Bob", OTHER_HASH, None).await.unwrap();

    let cache = manager.store().cache();
    cache.put(hash(DESC_HASH), json!({ "name": "Alice", "description": "A" }));
    cache.put(hash(OTHER_HASH), json!({ "name": "Bob", "description": "B" }));

    let report = manager.remove_candidate(alice).await.unwrap();

    assert_eq!(report.candidate.description_hash, DESC_HASH);
    assert!(report.storage_released);
    assert!(cache.get(&hash(DESC_HASH)).is_none());
    assert!(cache.get(&hash(OTHER_HASH)).is_some());
    assert_eq!(contract.len(), 1);
}

#[tokio::test]
async fn test_roster_falls_back_per_candidate() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    mock_pin_json(&pinata).await;

    let manager = manager(&gateway, &pinata).await;
    manager
        .add_candidate("Alice", "Platform text", None)
        .await
        .unwrap();
    manager
        .contract()
        .add_candidate("Bob", "not-a-hash", None)
        .await
        .unwrap();

    let roster = manager.roster().await.unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].1.name, "Alice");
    assert!(roster[1].1.is_placeholder());
}

#[tokio::test]
async fn test_vote_round_trip() {
    let gateway = MockServer::start().await;
    let pinata = MockServer::start().await;
    mock_pin_json(&pinata).await;

    let manager = manager(&gateway, &pinata).await;
    let a = manager.add_candidate("Alice", "A", None).await.unwrap();
    let b = manager.add_candidate("Bob", "B", None).await.unwrap();

    manager.vote(&[b, a]).await.unwrap();
    assert_eq!(manager.contract().first_choice_votes(b), 1);

    let err = manager.vote(&[CandidateId(42)]).await.unwrap_err();
    assert!(matches!(err, BallotError::CandidateNotFound(42)));
}
