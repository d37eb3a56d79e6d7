use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ProcessingStatus;

const DEFAULT_CAPACITY: usize = 1024;

/// In-memory per-item processing status, injectable rather than process-global.
///
/// Bounded: when a new item would exceed capacity, the entry with the oldest
/// update is evicted. Entries are a progress hint only; the database row is
/// authoritative, so losing one is harmless.
pub struct StatusRegistry {
    entries: Mutex<HashMap<String, ProcessingStatus>>,
    capacity: usize,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn begin(&self, item_id: &str, message: impl Into<String>) {
        self.put(ProcessingStatus::processing(item_id, message)).await;
    }

    pub async fn complete(&self, item_id: &str, message: impl Into<String>) {
        self.put(ProcessingStatus::complete(item_id, message)).await;
    }

    pub async fn fail(&self, item_id: &str, message: impl Into<String>) {
        self.put(ProcessingStatus::error(item_id, message)).await;
    }

    pub async fn get(&self, item_id: &str) -> Option<ProcessingStatus> {
        self.entries.lock().await.get(item_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn put(&self, status: ProcessingStatus) {
        let mut entries = self.entries.lock().await;

        if !entries.contains_key(status.item_id()) && entries.len() >= self.capacity {
            let oldest = entries
                .values()
                .min_by_key(|s| s.updated_at())
                .map(|s| s.item_id().to_string());
            if let Some(id) = oldest {
                debug!("Status registry full, evicting oldest entry: {}", id);
                entries.remove(&id);
            }
        }

        entries.insert(status.item_id().to_string(), status);
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProcessingState;

    #[tokio::test]
    async fn test_status_lifecycle() {
        let registry = StatusRegistry::new();

        registry.begin("item-1", "Uploading image").await;
        assert_eq!(
            registry.get("item-1").await.unwrap().state(),
            ProcessingState::Processing
        );

        registry.complete("item-1", "Done").await;
        let status = registry.get("item-1").await.unwrap();
        assert_eq!(status.state(), ProcessingState::Complete);
        assert_eq!(status.message(), "Done");
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let registry = StatusRegistry::new();
        assert!(registry.get("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_bounded_eviction() {
        let registry = StatusRegistry::with_capacity(2);

        registry.begin("a", "one").await;
        registry.begin("b", "two").await;
        registry.begin("c", "three").await;

        assert_eq!(registry.len().await, 2);
        assert!(registry.get("c").await.is_some());
    }

    #[tokio::test]
    async fn test_update_does_not_evict() {
        let registry = StatusRegistry::with_capacity(2);

        registry.begin("a", "one").await;
        registry.begin("b", "two").await;
        registry.complete("a", "done").await;

        assert_eq!(registry.len().await, 2);
        assert!(registry.get("a").await.is_some());
        assert!(registry.get("b").await.is_some());
    }
}
