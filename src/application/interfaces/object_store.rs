use async_trait::async_trait;

use crate::domain::DomainError;

/// External object storage for item images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads the object and returns its public URL.
    async fn upload(
        &self,
        object_name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, DomainError>;

    /// Fetches the raw bytes behind a previously issued public URL.
    async fn download(&self, url: &str) -> Result<Vec<u8>, DomainError>;

    async fn delete(&self, object_name: &str) -> Result<(), DomainError>;
}
