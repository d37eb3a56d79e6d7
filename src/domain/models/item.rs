use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// A found item registered by a user. Immutable after creation; removed only
/// through the deletion use case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: String,
    title: String,
    description: Option<String>,
    location: String,
    image_url: String,
    file_name: String,
    user_id: String,
    embedding: Vec<f32>,
    created_at: i64,
}

impl Item {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        title: String,
        description: Option<String>,
        location: String,
        image_url: String,
        file_name: String,
        user_id: String,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            location,
            image_url,
            file_name,
            user_id,
            embedding,
            created_at: current_timestamp(),
        }
    }

    /// Reconstitutes from persisted data (used by adapters).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: String,
        title: String,
        description: Option<String>,
        location: String,
        image_url: String,
        file_name: String,
        user_id: String,
        embedding: Vec<f32>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title,
            description,
            location,
            image_url,
            file_name,
            user_id,
            embedding,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// The raw fields of an ingestion request, before any side effect has run.
#[derive(Debug, Clone)]
pub struct ItemSubmission {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub file_name: String,
    pub content_type: String,
    pub image: Vec<u8>,
}

impl ItemSubmission {
    /// Fail-fast field validation. Must be called before any external call.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("Missing required field: title"));
        }
        if self.location.trim().is_empty() {
            return Err(DomainError::validation("Missing required field: location"));
        }
        if self.image.is_empty() {
            return Err(DomainError::validation("Missing required field: image"));
        }
        Ok(())
    }

    /// Object name in the external store: fresh id + sanitized original filename.
    pub fn object_name(&self, item_id: &str) -> String {
        format!("{}_{}", item_id, sanitize_file_name(&self.file_name))
    }
}

pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Strips path separators and anything outside `[A-Za-z0-9._-]` so the name is
/// safe as an object-store key.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ItemSubmission {
        ItemSubmission {
            title: "Blue backpack".to_string(),
            description: None,
            location: "Central station".to_string(),
            file_name: "photo.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            image: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut s = submission();
        s.title = "   ".to_string();
        let err = s.validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut s = submission();
        s.image.clear();
        assert!(s.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_file_name("///"), "upload");
    }

    #[test]
    fn test_object_name_includes_item_id() {
        let name = submission().object_name("abc-123");
        assert_eq!(name, "abc-123_photo.jpg");
    }

    #[test]
    fn test_ownership() {
        let item = Item::new(
            new_item_id(),
            "Keys".to_string(),
            None,
            "Library".to_string(),
            "https://store/keys.jpg".to_string(),
            "keys.jpg".to_string(),
            "user-1".to_string(),
            vec![0.0; 4],
        );
        assert!(item.is_owned_by("user-1"));
        assert!(!item.is_owned_by("user-2"));
    }
}
