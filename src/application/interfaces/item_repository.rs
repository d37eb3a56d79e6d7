use async_trait::async_trait;

use crate::domain::{DomainError, Item, SearchQuery, SearchResult};

/// Item persistence and similarity search against the external data store.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn insert(&self, item: &Item) -> Result<(), DomainError>;

    async fn find_by_id(&self, item_id: &str) -> Result<Option<Item>, DomainError>;

    async fn delete(&self, item_id: &str) -> Result<(), DomainError>;

    /// Nearest-neighbor search ranked by descending similarity. The backend
    /// performs the ranking; callers still re-apply threshold and cap when
    /// shaping the response.
    async fn search(
        &self,
        query_embedding: &[f32],
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError>;
}
