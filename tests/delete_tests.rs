//! Tests of the deletion use case: ownership enforcement and the
//! storage-then-database removal order.

mod common;

use std::sync::Arc;

use lostfound::{DeleteItemUseCase, DomainError};

use common::{admin_user, sample_item, test_user, CountingObjectStore, FlakyItemRepository};

struct Fixture {
    repo: Arc<FlakyItemRepository>,
    store: Arc<CountingObjectStore>,
    use_case: DeleteItemUseCase,
}

fn fixture() -> Fixture {
    let repo = Arc::new(FlakyItemRepository::reliable());
    let store = Arc::new(CountingObjectStore::new());
    let use_case = DeleteItemUseCase::new(repo.clone(), store.clone());

    Fixture {
        repo,
        store,
        use_case,
    }
}

#[tokio::test]
async fn owner_can_delete() {
    let f = fixture();
    f.repo.put(sample_item("item-1", "user-1")).await;

    f.use_case
        .execute(&test_user("user-1"), "item-1", "item-1.jpg")
        .await
        .unwrap();

    assert!(f.repo.stored("item-1").await.is_none());
    assert_eq!(f.store.delete_count(), 1);
}

#[tokio::test]
async fn non_owner_is_rejected() {
    let f = fixture();
    f.repo.put(sample_item("item-1", "user-1")).await;

    let err = f
        .use_case
        .execute(&test_user("user-2"), "item-1", "item-1.jpg")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Forbidden(_)));
    assert!(f.repo.stored("item-1").await.is_some());
    assert_eq!(f.store.delete_count(), 0);
}

#[tokio::test]
async fn admin_can_delete_any_item() {
    let f = fixture();
    f.repo.put(sample_item("item-1", "user-1")).await;

    f.use_case
        .execute(&admin_user("root"), "item-1", "item-1.jpg")
        .await
        .unwrap();

    assert!(f.repo.stored("item-1").await.is_none());
}

#[tokio::test]
async fn deleting_missing_item_is_not_found() {
    let f = fixture();

    let err = f
        .use_case
        .execute(&test_user("user-1"), "ghost", "ghost.jpg")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(f.store.delete_count(), 0);
}
