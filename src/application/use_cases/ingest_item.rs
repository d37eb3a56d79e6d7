use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::application::{EmbeddingService, ItemRepository, ObjectStore, StatusRegistry};
use crate::domain::{new_item_id, AuthenticatedUser, DomainError, Item, ItemSubmission};

const MAX_INSERT_ATTEMPTS: u32 = 3;

/// What the upload endpoint returns on success.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub item_id: String,
    pub image_url: String,
    pub elapsed: Duration,
}

/// Use case for registering a found item: validate, upload the image, embed it,
/// persist the record with bounded retries.
pub struct IngestItemUseCase {
    item_repo: Arc<dyn ItemRepository>,
    object_store: Arc<dyn ObjectStore>,
    embedding_service: Arc<dyn EmbeddingService>,
    status_registry: Arc<StatusRegistry>,
}

impl IngestItemUseCase {
    pub fn new(
        item_repo: Arc<dyn ItemRepository>,
        object_store: Arc<dyn ObjectStore>,
        embedding_service: Arc<dyn EmbeddingService>,
        status_registry: Arc<StatusRegistry>,
    ) -> Self {
        Self {
            item_repo,
            object_store,
            embedding_service,
            status_registry,
        }
    }

    pub async fn execute(
        &self,
        user: &AuthenticatedUser,
        submission: ItemSubmission,
    ) -> Result<IngestReceipt, DomainError> {
        // Field validation happens before any external call.
        submission.validate()?;

        let start_time = Instant::now();
        let item_id = new_item_id();

        info!(
            "Ingesting item {} ({:?}) for user {}",
            item_id,
            submission.title,
            user.id()
        );

        self.status_registry
            .begin(&item_id, "Uploading image")
            .await;

        match self.run_pipeline(user, &submission, &item_id).await {
            Ok(image_url) => {
                self.status_registry
                    .complete(&item_id, "Item registered")
                    .await;

                let elapsed = start_time.elapsed();
                info!(
                    "Item {} ingested in {:.2}s",
                    item_id,
                    elapsed.as_secs_f64()
                );

                Ok(IngestReceipt {
                    item_id,
                    image_url,
                    elapsed,
                })
            }
            Err(e) => {
                self.status_registry.fail(&item_id, e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        user: &AuthenticatedUser,
        submission: &ItemSubmission,
        item_id: &str,
    ) -> Result<String, DomainError> {
        // Upload is not retried: a failure here is fatal for the request.
        let object_name = submission.object_name(item_id);
        let image_url = self
            .object_store
            .upload(&object_name, &submission.image, &submission.content_type)
            .await?;

        if image_url.is_empty() {
            return Err(DomainError::storage(
                "Object store returned an empty public URL",
            ));
        }

        self.status_registry
            .begin(item_id, "Computing embedding")
            .await;

        let embedding = self.embedding_service.embed_image(&submission.image).await?;

        let expected = self.embedding_service.config().dimensions();
        if embedding.len() != expected {
            // Model/config drift. Never truncated or padded.
            return Err(DomainError::embedding(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                expected,
                embedding.len()
            )));
        }

        let item = Item::new(
            item_id.to_string(),
            submission.title.trim().to_string(),
            submission
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            submission.location.trim().to_string(),
            image_url.clone(),
            object_name,
            user.id().to_string(),
            embedding,
        );

        self.status_registry.begin(item_id, "Saving item").await;
        self.insert_with_retry(&item).await?;

        Ok(image_url)
    }

    /// Persists the item, retrying on any failure with a 2^attempt-second delay
    /// between attempts. Row-level security rejections are logged distinctly but
    /// still consume a retry attempt.
    async fn insert_with_retry(&self, item: &Item) -> Result<(), DomainError> {
        let mut last_error = None;

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            match self.item_repo.insert(item).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    if e.is_rls_denied() {
                        warn!(
                            "Insert attempt {}/{} for item {} denied by row-level security: {}",
                            attempt,
                            MAX_INSERT_ATTEMPTS,
                            item.id(),
                            e
                        );
                    } else {
                        warn!(
                            "Insert attempt {}/{} for item {} failed: {}",
                            attempt,
                            MAX_INSERT_ATTEMPTS,
                            item.id(),
                            e
                        );
                    }
                    last_error = Some(e);
                }
            }

            if attempt < MAX_INSERT_ATTEMPTS {
                let delay = Duration::from_secs(1u64 << attempt);
                tokio::time::sleep(delay).await;
            }
        }

        let last = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Err(DomainError::persistence(format!(
            "Insert failed after {} attempts: {}",
            MAX_INSERT_ATTEMPTS, last
        )))
    }
}
