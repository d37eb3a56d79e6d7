pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    AuthService, DeleteItemUseCase, EmbeddingService, IngestItemUseCase, IngestReceipt,
    ItemRepository, ObjectStore, SearchItemsUseCase, StatusRegistry,
};

pub use connector::{
    build_router, Container, ContainerConfig, InMemoryItemRepository, InMemoryObjectStore,
    LazyClipEmbedding, MockEmbedding, OrtClipEmbedding, StaticAuth, SupabaseAuth,
    SupabaseItemRepository, SupabaseObjectStore,
};

pub use domain::{
    AuthenticatedUser, DomainError, EmbeddingConfig, Item, ItemSubmission, MaxResults,
    ProcessingState, ProcessingStatus, SearchQuery, SearchResult, EMBEDDING_DIMENSIONS,
};
