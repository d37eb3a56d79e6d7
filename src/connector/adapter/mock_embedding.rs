use async_trait::async_trait;
use rand::Rng;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig, EMBEDDING_DIMENSIONS};

/// Deterministic stand-in for the CLIP pipeline: embeddings are seeded from a
/// content hash, so equal inputs always produce equal vectors.
pub struct MockEmbedding {
    config: EmbeddingConfig,
}

impl MockEmbedding {
    pub fn new() -> Self {
        Self::with_dimensions(EMBEDDING_DIMENSIONS)
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            config: EmbeddingConfig::new("mock-embedding".to_string(), dimensions, 224),
        }
    }

    fn generate_embedding(&self, seed: u64) -> Vec<f32> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut vector: Vec<f32> = (0..self.config.dimensions())
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }

        vector
    }
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for MockEmbedding {
    async fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>, DomainError> {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        let vector = self.generate_embedding(hasher.finish());

        debug!(
            "Generated mock image embedding ({} bytes in, {} dimensions out)",
            bytes.len(),
            vector.len()
        );
        Ok(vector)
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        Ok(self.generate_embedding(hasher.finish()))
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
