//! End-to-end tests of the ingestion pipeline: fail-fast validation, the
//! persistence retry policy, and the processing-status lifecycle.

mod common;

use std::sync::Arc;

use lostfound::domain::{ItemSubmission, ProcessingState};
use lostfound::{IngestItemUseCase, StatusRegistry};

use common::{test_user, CountingEmbedding, CountingObjectStore, FlakyItemRepository};

const DIMS: usize = 512;

fn submission() -> ItemSubmission {
    ItemSubmission {
        title: "Blue backpack".to_string(),
        description: Some("Nylon, one strap torn".to_string()),
        location: "Central station".to_string(),
        file_name: "backpack.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        image: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

struct Fixture {
    repo: Arc<FlakyItemRepository>,
    store: Arc<CountingObjectStore>,
    embedding: Arc<CountingEmbedding>,
    registry: Arc<StatusRegistry>,
    use_case: IngestItemUseCase,
}

fn fixture(repo: FlakyItemRepository, embedding: CountingEmbedding) -> Fixture {
    let repo = Arc::new(repo);
    let store = Arc::new(CountingObjectStore::new());
    let embedding = Arc::new(embedding);
    let registry = Arc::new(StatusRegistry::new());

    let use_case = IngestItemUseCase::new(
        repo.clone(),
        store.clone(),
        embedding.clone(),
        registry.clone(),
    );

    Fixture {
        repo,
        store,
        embedding,
        registry,
        use_case,
    }
}

#[tokio::test]
async fn missing_fields_touch_no_external_service() {
    let f = fixture(
        FlakyItemRepository::reliable(),
        CountingEmbedding::well_behaved(DIMS),
    );

    for broken in [
        ItemSubmission {
            title: "  ".to_string(),
            ..submission()
        },
        ItemSubmission {
            location: String::new(),
            ..submission()
        },
        ItemSubmission {
            image: Vec::new(),
            ..submission()
        },
    ] {
        let err = f.use_case.execute(&test_user("user-1"), broken).await.unwrap_err();
        assert!(err.is_validation());
    }

    assert_eq!(f.store.upload_count(), 0);
    assert_eq!(f.embedding.image_call_count(), 0);
    assert_eq!(f.repo.attempts(), 0);
}

#[tokio::test]
async fn successful_ingest_persists_full_embedding() {
    let f = fixture(
        FlakyItemRepository::reliable(),
        CountingEmbedding::well_behaved(DIMS),
    );

    let receipt = f
        .use_case
        .execute(&test_user("user-1"), submission())
        .await
        .unwrap();

    assert!(!receipt.image_url.is_empty());
    assert_eq!(f.repo.attempts(), 1);

    let stored = f.repo.stored(&receipt.item_id).await.unwrap();
    assert_eq!(stored.embedding().len(), DIMS);
    assert_eq!(stored.user_id(), "user-1");
    assert_eq!(stored.image_url(), receipt.image_url);

    let status = f.registry.get(&receipt.item_id).await.unwrap();
    assert_eq!(status.state(), ProcessingState::Complete);
}

#[tokio::test]
async fn dimension_mismatch_aborts_before_persistence() {
    let f = fixture(
        FlakyItemRepository::reliable(),
        CountingEmbedding::drifted(DIMS, 128),
    );

    let err = f
        .use_case
        .execute(&test_user("user-1"), submission())
        .await
        .unwrap_err();

    assert!(matches!(err, lostfound::DomainError::Embedding(_)));
    assert_eq!(f.repo.attempts(), 0);
    // The image was already uploaded; no rollback is attempted.
    assert_eq!(f.store.upload_count(), 1);

    // The insert never ran, so the item id is recovered from the uploaded
    // object name ({id}_{file_name}).
    let object_name = f.store.last_object_name().await.unwrap();
    let item_id = object_name.strip_suffix("_backpack.jpg").unwrap();
    let status = f.registry.get(item_id).await.unwrap();
    assert_eq!(status.state(), ProcessingState::Error);
}

#[tokio::test(start_paused = true)]
async fn insert_retries_with_exponential_backoff() {
    let f = fixture(
        FlakyItemRepository::failing(2),
        CountingEmbedding::well_behaved(DIMS),
    );

    let clock = tokio::time::Instant::now();
    let receipt = f
        .use_case
        .execute(&test_user("user-1"), submission())
        .await
        .unwrap();

    // Two failures then success: 3 attempts, 2s + 4s of backoff.
    assert_eq!(f.repo.attempts(), 3);
    assert_eq!(clock.elapsed(), std::time::Duration::from_secs(6));
    assert!(f.repo.stored(&receipt.item_id).await.is_some());
}

#[tokio::test(start_paused = true)]
async fn insert_exhaustion_reports_persistence_error() {
    let f = fixture(
        FlakyItemRepository::failing(usize::MAX),
        CountingEmbedding::well_behaved(DIMS),
    );

    let err = f
        .use_case
        .execute(&test_user("user-1"), submission())
        .await
        .unwrap_err();

    assert_eq!(f.repo.attempts(), 3);
    assert!(matches!(err, lostfound::DomainError::Persistence(_)));
}

#[tokio::test(start_paused = true)]
async fn rls_rejection_consumes_retry_attempts() {
    // Row-level security denials are logged distinctly but retried like any
    // other persistence failure.
    let f = fixture(
        FlakyItemRepository::rls_denying(usize::MAX),
        CountingEmbedding::well_behaved(DIMS),
    );

    let err = f
        .use_case
        .execute(&test_user("user-1"), submission())
        .await
        .unwrap_err();

    assert_eq!(f.repo.attempts(), 3);
    assert!(matches!(err, lostfound::DomainError::Persistence(_)));
}

#[tokio::test(start_paused = true)]
async fn failed_ingest_records_error_status() {
    let f = fixture(
        FlakyItemRepository::failing(usize::MAX),
        CountingEmbedding::well_behaved(DIMS),
    );

    f.use_case
        .execute(&test_user("user-1"), submission())
        .await
        .unwrap_err();

    // The status registry keeps the terminal error, keyed by the generated id.
    assert_eq!(f.registry.len().await, 1);
    let item_id = f.repo.last_attempted_id().await.unwrap();
    let status = f.registry.get(&item_id).await.unwrap();
    assert_eq!(status.state(), ProcessingState::Error);
    assert!(status.state().is_terminal());
}
