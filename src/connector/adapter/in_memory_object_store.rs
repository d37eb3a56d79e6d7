use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ObjectStore;
use crate::domain::DomainError;

const URL_SCHEME: &str = "memory://";

/// Object store keeping uploads in a map, for dev mode and tests. Issues
/// `memory://{bucket}/{name}` URLs that only this store can resolve.
pub struct InMemoryObjectStore {
    bucket: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub async fn contains(&self, object_name: &str) -> bool {
        self.objects.lock().await.contains_key(object_name)
    }

    fn object_url(&self, object_name: &str) -> String {
        format!("{}{}/{}", URL_SCHEME, self.bucket, object_name)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        object_name: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, DomainError> {
        let mut objects = self.objects.lock().await;
        objects.insert(object_name.to_string(), bytes.to_vec());
        debug!("Stored {} bytes as {}", bytes.len(), object_name);
        Ok(self.object_url(object_name))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let prefix = format!("{}{}/", URL_SCHEME, self.bucket);
        let object_name = url
            .strip_prefix(&prefix)
            .ok_or_else(|| DomainError::storage(format!("Unresolvable object URL: {}", url)))?;

        let objects = self.objects.lock().await;
        objects
            .get(object_name)
            .cloned()
            .ok_or_else(|| DomainError::storage(format!("Object not found: {}", object_name)))
    }

    async fn delete(&self, object_name: &str) -> Result<(), DomainError> {
        let mut objects = self.objects.lock().await;
        objects
            .remove(object_name)
            .ok_or_else(|| DomainError::storage(format!("Object not found: {}", object_name)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_download_roundtrip() {
        let store = InMemoryObjectStore::new("items");

        let url = store
            .upload("abc_photo.jpg", &[1, 2, 3], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(url, "memory://items/abc_photo.jpg");

        let bytes = store.download(&url).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_missing_object_fails() {
        let store = InMemoryObjectStore::new("items");
        assert!(store.delete("missing.jpg").await.is_err());
    }
}
