use async_trait::async_trait;

use crate::domain::{DomainError, EmbeddingConfig};

/// Generates vector embeddings from images and queries.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>, DomainError>;

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    fn config(&self) -> &EmbeddingConfig;
}
