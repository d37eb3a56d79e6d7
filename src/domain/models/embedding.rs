use serde::{Deserialize, Serialize};

/// Expected length of every stored embedding vector (CLIP ViT-B/32).
/// A pipeline producing anything else signals model/config drift and aborts
/// ingestion before persistence.
pub const EMBEDDING_DIMENSIONS: usize = 512;

/// Configuration for the embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    model_name: String,
    dimensions: usize,
    image_size: u32,
}

impl EmbeddingConfig {
    pub fn new(model_name: String, dimensions: usize, image_size: u32) -> Self {
        Self {
            model_name,
            dimensions,
            image_size,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: "mock-embedding".to_string(),
            dimensions: EMBEDDING_DIMENSIONS,
            image_size: 224,
        }
    }
}
