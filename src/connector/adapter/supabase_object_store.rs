use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::application::ObjectStore;
use crate::domain::DomainError;

/// Item image storage backed by the Supabase storage API.
pub struct SupabaseObjectStore {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseObjectStore {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            bucket: bucket.into(),
        }
    }

    fn object_endpoint(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_name
        )
    }

    fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_name
        )
    }
}

#[async_trait]
impl ObjectStore for SupabaseObjectStore {
    async fn upload(
        &self,
        object_name: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, DomainError> {
        let response = self
            .client
            .post(self.object_endpoint(object_name))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Content-Type", content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::storage(format!(
                "Upload of {} rejected ({}): {}",
                object_name, status, body
            )));
        }

        debug!("Uploaded {} ({} bytes)", object_name, bytes.len());
        Ok(self.public_url(object_name))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Download request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::storage(format!(
                "Download of {} failed ({})",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::storage(format!("Download body read failed: {}", e)))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, object_name: &str) -> Result<(), DomainError> {
        let response = self
            .client
            .delete(self.object_endpoint(object_name))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await
            .map_err(|e| DomainError::storage(format!("Delete request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DomainError::storage(format!(
                "Delete of {} rejected ({})",
                object_name,
                response.status()
            )));
        }

        debug!("Deleted object {}", object_name);
        Ok(())
    }
}
