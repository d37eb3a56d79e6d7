use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ItemRepository;
use crate::domain::{DomainError, Item, SearchQuery, SearchResult};

/// Item store with brute-force cosine ranking, for dev mode and tests.
pub struct InMemoryItemRepository {
    items: Mutex<HashMap<String, Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

impl Default for InMemoryItemRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), DomainError> {
        let mut items = self.items.lock().await;
        items.insert(item.id().to_string(), item.clone());
        debug!("Saved item {} to memory", item.id());
        Ok(())
    }

    async fn find_by_id(&self, item_id: &str) -> Result<Option<Item>, DomainError> {
        let items = self.items.lock().await;
        Ok(items.get(item_id).cloned())
    }

    async fn delete(&self, item_id: &str) -> Result<(), DomainError> {
        let mut items = self.items.lock().await;
        items.remove(item_id);
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let items = self.items.lock().await;

        let mut results: Vec<SearchResult> = items
            .values()
            .map(|item| {
                let score = cosine_similarity(query_embedding, item.embedding());
                SearchResult::new(item.clone(), score)
            })
            .filter(|r| r.is_relevant(query.threshold()))
            .collect();

        results.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(query.max_results().cap());

        Ok(results)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
