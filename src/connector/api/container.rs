use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::application::{
    AuthService, DeleteItemUseCase, EmbeddingService, IngestItemUseCase, ItemRepository,
    ObjectStore, SearchItemsUseCase, StatusRegistry,
};
use crate::{
    InMemoryItemRepository, InMemoryObjectStore, LazyClipEmbedding, MockEmbedding, StaticAuth,
    SupabaseAuth, SupabaseItemRepository, SupabaseObjectStore,
};

pub struct ContainerConfig {
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub bucket: String,
    pub model_id: Option<String>,
    pub mock_embeddings: bool,
    pub memory_storage: bool,
}

/// Wires adapters to use cases. One container per process, shared by all
/// request handlers.
pub struct Container {
    auth_service: Arc<dyn AuthService>,
    embedding_service: Arc<dyn EmbeddingService>,
    object_store: Arc<dyn ObjectStore>,
    item_repo: Arc<dyn ItemRepository>,
    status_registry: Arc<StatusRegistry>,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let embedding_service: Arc<dyn EmbeddingService> = if config.mock_embeddings {
            debug!("Using mock embedding service");
            Arc::new(MockEmbedding::new())
        } else {
            debug!("Using lazily initialized CLIP embedding service");
            Arc::new(LazyClipEmbedding::new(config.model_id.clone()))
        };

        let supabase = match (&config.supabase_url, &config.supabase_anon_key) {
            (Some(url), Some(key)) if !config.memory_storage => {
                Some((url.clone(), key.clone()))
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("Incomplete Supabase configuration, falling back to in-memory storage");
                None
            }
            _ => None,
        };

        let (auth_service, object_store, item_repo): (
            Arc<dyn AuthService>,
            Arc<dyn ObjectStore>,
            Arc<dyn ItemRepository>,
        ) = match supabase {
            Some((url, key)) => {
                info!("Using Supabase backend at {}", url);
                let client = reqwest::Client::new();
                (
                    Arc::new(SupabaseAuth::new(client.clone(), url.clone(), key.clone())),
                    Arc::new(SupabaseObjectStore::new(
                        client.clone(),
                        url.clone(),
                        key.clone(),
                        config.bucket.clone(),
                    )),
                    Arc::new(SupabaseItemRepository::new(client, url, key)),
                )
            }
            None => {
                info!("Using in-memory backend (items are lost on restart)");
                (
                    Arc::new(StaticAuth::permissive()),
                    Arc::new(InMemoryObjectStore::new(config.bucket.clone())),
                    Arc::new(InMemoryItemRepository::new()),
                )
            }
        };

        Ok(Self {
            auth_service,
            embedding_service,
            object_store,
            item_repo,
            status_registry: Arc::new(StatusRegistry::new()),
        })
    }

    /// Test/bespoke wiring with explicit adapters.
    pub fn with_services(
        auth_service: Arc<dyn AuthService>,
        embedding_service: Arc<dyn EmbeddingService>,
        object_store: Arc<dyn ObjectStore>,
        item_repo: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            auth_service,
            embedding_service,
            object_store,
            item_repo,
            status_registry: Arc::new(StatusRegistry::new()),
        }
    }

    pub fn ingest_use_case(&self) -> IngestItemUseCase {
        IngestItemUseCase::new(
            self.item_repo.clone(),
            self.object_store.clone(),
            self.embedding_service.clone(),
            self.status_registry.clone(),
        )
    }

    pub fn search_use_case(&self) -> SearchItemsUseCase {
        SearchItemsUseCase::new(
            self.item_repo.clone(),
            self.object_store.clone(),
            self.embedding_service.clone(),
        )
    }

    pub fn delete_use_case(&self) -> DeleteItemUseCase {
        DeleteItemUseCase::new(self.item_repo.clone(), self.object_store.clone())
    }

    pub fn auth_service(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    pub fn status_registry(&self) -> Arc<StatusRegistry> {
        self.status_registry.clone()
    }
}
