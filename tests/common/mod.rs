//! Shared counting stubs for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lostfound::domain::{
    AuthenticatedUser, DomainError, EmbeddingConfig, Item, SearchQuery, SearchResult,
};
use lostfound::{EmbeddingService, ItemRepository, ObjectStore};

pub fn test_user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(id.to_string(), None, "authenticated".to_string())
}

pub fn admin_user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(id.to_string(), None, "admin".to_string())
}

/// Item repository that fails the first `failures` inserts, counting attempts.
pub struct FlakyItemRepository {
    failures: usize,
    rls: bool,
    pub insert_attempts: AtomicUsize,
    attempted_ids: Mutex<Vec<String>>,
    items: Mutex<HashMap<String, Item>>,
    pub canned_results: Mutex<Vec<SearchResult>>,
}

impl FlakyItemRepository {
    pub fn reliable() -> Self {
        Self::failing(0)
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            failures,
            rls: false,
            insert_attempts: AtomicUsize::new(0),
            attempted_ids: Mutex::new(Vec::new()),
            items: Mutex::new(HashMap::new()),
            canned_results: Mutex::new(Vec::new()),
        }
    }

    pub fn rls_denying(failures: usize) -> Self {
        Self {
            rls: true,
            ..Self::failing(failures)
        }
    }

    pub fn attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Id of the last item whose insert was attempted, successful or not.
    pub async fn last_attempted_id(&self) -> Option<String> {
        self.attempted_ids.lock().await.last().cloned()
    }

    pub async fn stored(&self, item_id: &str) -> Option<Item> {
        self.items.lock().await.get(item_id).cloned()
    }

    pub async fn put(&self, item: Item) {
        self.items.lock().await.insert(item.id().to_string(), item);
    }
}

#[async_trait]
impl ItemRepository for FlakyItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), DomainError> {
        self.attempted_ids.lock().await.push(item.id().to_string());
        let attempt = self.insert_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            if self.rls {
                return Err(DomainError::rls_denied("policy denies insert"));
            }
            return Err(DomainError::persistence("connection reset"));
        }
        self.items
            .lock()
            .await
            .insert(item.id().to_string(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, item_id: &str) -> Result<Option<Item>, DomainError> {
        Ok(self.items.lock().await.get(item_id).cloned())
    }

    async fn delete(&self, item_id: &str) -> Result<(), DomainError> {
        self.items.lock().await.remove(item_id);
        Ok(())
    }

    async fn search(
        &self,
        _query_embedding: &[f32],
        _query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        Ok(self.canned_results.lock().await.clone())
    }
}

/// Object store counting uploads and deletes.
pub struct CountingObjectStore {
    pub uploads: AtomicUsize,
    pub deletes: AtomicUsize,
    last_object_name: Mutex<Option<String>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl CountingObjectStore {
    pub fn new() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            last_object_name: Mutex::new(None),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub async fn put(&self, url: &str, bytes: Vec<u8>) {
        self.objects.lock().await.insert(url.to_string(), bytes);
    }

    /// Name of the most recently uploaded object (`{item_id}_{file_name}`).
    pub async fn last_object_name(&self) -> Option<String> {
        self.last_object_name.lock().await.clone()
    }
}

#[async_trait]
impl ObjectStore for CountingObjectStore {
    async fn upload(
        &self,
        object_name: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, DomainError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        *self.last_object_name.lock().await = Some(object_name.to_string());
        let url = format!("stub://items/{}", object_name);
        self.objects.lock().await.insert(url.clone(), bytes.to_vec());
        Ok(url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        self.objects
            .lock()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::storage(format!("Object not found: {}", url)))
    }

    async fn delete(&self, _object_name: &str) -> Result<(), DomainError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Embedding service producing fixed-length vectors and counting invocations.
pub struct CountingEmbedding {
    config: EmbeddingConfig,
    produced_len: usize,
    pub image_calls: AtomicUsize,
    pub text_calls: AtomicUsize,
}

impl CountingEmbedding {
    /// Well-behaved pipeline: produced length matches the configured dimension.
    pub fn well_behaved(dimensions: usize) -> Self {
        Self::with_lengths(dimensions, dimensions)
    }

    /// Drifted pipeline: produced length differs from the configured dimension.
    pub fn drifted(expected: usize, produced: usize) -> Self {
        Self::with_lengths(expected, produced)
    }

    fn with_lengths(expected: usize, produced: usize) -> Self {
        Self {
            config: EmbeddingConfig::new("stub-embedding".to_string(), expected, 224),
            produced_len: produced,
            image_calls: AtomicUsize::new(0),
            text_calls: AtomicUsize::new(0),
        }
    }

    pub fn image_call_count(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn text_call_count(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingService for CountingEmbedding {
    async fn embed_image(&self, _bytes: &[u8]) -> Result<Vec<f32>, DomainError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.5; self.produced_len])
    }

    async fn embed_text(&self, _text: &str) -> Result<Vec<f32>, DomainError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.5; self.produced_len])
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

pub fn sample_item(id: &str, owner: &str) -> Item {
    Item::new(
        id.to_string(),
        "Black umbrella".to_string(),
        Some("Left near the fountain".to_string()),
        "City park".to_string(),
        format!("stub://items/{}.jpg", id),
        format!("{}.jpg", id),
        owner.to_string(),
        vec![0.5; 8],
    )
}

pub type SharedRepo = Arc<FlakyItemRepository>;
