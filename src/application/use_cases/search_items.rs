use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::{EmbeddingService, ItemRepository, ObjectStore};
use crate::domain::{DomainError, SearchQuery, SearchResult};

/// Use case for finding lost items by text, by a fresh image, or by the image
/// of an already-registered item.
pub struct SearchItemsUseCase {
    item_repo: Arc<dyn ItemRepository>,
    object_store: Arc<dyn ObjectStore>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl SearchItemsUseCase {
    pub fn new(
        item_repo: Arc<dyn ItemRepository>,
        object_store: Arc<dyn ObjectStore>,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            item_repo,
            object_store,
            embedding_service,
        }
    }

    pub async fn search_text(
        &self,
        raw_query: &str,
        query: SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        query.validate()?;

        // Empty query short-circuits without invoking the pipeline.
        let trimmed = raw_query.trim();
        if trimmed.is_empty() {
            debug!("Empty text query, returning no results");
            return Ok(Vec::new());
        }

        info!("Text search: {:?} (threshold={})", trimmed, query.threshold());
        let start_time = Instant::now();

        let embedding = self.embedding_service.embed_text(trimmed).await?;
        let results = self.item_repo.search(&embedding, &query).await?;
        let results = shape_results(results, &query);

        info!(
            "Text search returned {} results in {:.2}s",
            results.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(results)
    }

    pub async fn search_image(
        &self,
        image: &[u8],
        query: SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        query.validate()?;

        if image.is_empty() {
            return Err(DomainError::validation("Missing required field: image"));
        }

        info!(
            "Image search: {} bytes (threshold={})",
            image.len(),
            query.threshold()
        );
        let start_time = Instant::now();

        let embedding = self.embedding_service.embed_image(image).await?;
        let results = self.item_repo.search(&embedding, &query).await?;
        let results = shape_results(results, &query);

        info!(
            "Image search returned {} results in {:.2}s",
            results.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(results)
    }

    /// Convenience variant: search using the stored image of an existing item.
    pub async fn search_by_item(
        &self,
        item_id: &str,
        query: SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        query.validate()?;

        let item = self
            .item_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Item not found: {}", item_id)))?;

        debug!("Searching with stored image of item {}", item_id);
        let image = self.object_store.download(item.image_url()).await?;

        self.search_image(&image, query).await
    }
}

/// Response shaping: the data store ranks, but the contract (score >= threshold,
/// count <= cap, descending order) is enforced here regardless of backend.
fn shape_results(mut results: Vec<SearchResult>, query: &SearchQuery) -> Vec<SearchResult> {
    results.retain(|r| r.is_relevant(query.threshold()));
    results.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(query.max_results().cap());
    results
}
