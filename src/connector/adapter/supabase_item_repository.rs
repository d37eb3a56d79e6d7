use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::application::ItemRepository;
use crate::domain::{DomainError, Item, MaxResults, SearchQuery, SearchResult};

/// Postgres error code for a row-level security policy violation.
const RLS_VIOLATION_CODE: &str = "42501";

/// Items table and `match_items` similarity RPC, spoken over PostgREST.
pub struct SupabaseItemRepository {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemRow {
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

#[derive(Debug, Deserialize)]
struct MatchRow {
    #[serde(flatten)]
    item: ItemRow,
    similarity: f32,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

impl SupabaseItemRepository {
    pub fn new(client: Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }

    fn table_endpoint(&self) -> String {
        format!("{}/rest/v1/items", self.base_url)
    }

    fn row_from(item: &Item) -> ItemRow {
        ItemRow {
            id: item.id().to_string(),
            title: item.title().to_string(),
            description: item.description().map(String::from),
            location: item.location().to_string(),
            image_url: item.image_url().to_string(),
            file_name: item.file_name().to_string(),
            user_id: item.user_id().to_string(),
            embedding: item.embedding().to_vec(),
            created_at: item.created_at(),
        }
    }

    fn item_from(row: ItemRow) -> Item {
        Item::reconstitute(
            row.id,
            row.title,
            row.description,
            row.location,
            row.image_url,
            row.file_name,
            row.user_id,
            row.embedding,
            row.created_at,
        )
    }

    /// Maps a PostgREST failure body to the error taxonomy, keeping RLS
    /// rejections distinguishable for the retry loop's logging.
    async fn persistence_error(response: reqwest::Response) -> DomainError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<PostgrestError>(&body) {
            let message = err.message.unwrap_or_else(|| body.clone());
            if err.code.as_deref() == Some(RLS_VIOLATION_CODE) {
                return DomainError::rls_denied(message);
            }
            return DomainError::persistence(format!("{} ({})", message, status));
        }

        DomainError::persistence(format!("Database request failed ({}): {}", status, body))
    }
}

#[async_trait]
impl ItemRepository for SupabaseItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), DomainError> {
        let response = self
            .client
            .post(self.table_endpoint())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Prefer", "return=minimal")
            .json(&Self::row_from(item))
            .send()
            .await
            .map_err(|e| DomainError::persistence(format!("Insert request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::persistence_error(response).await);
        }

        debug!("Inserted item {}", item.id());
        Ok(())
    }

    async fn find_by_id(&self, item_id: &str) -> Result<Option<Item>, DomainError> {
        let response = self
            .client
            .get(self.table_endpoint())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&[("id", format!("eq.{}", item_id)), ("select", "*".to_string())])
            .send()
            .await
            .map_err(|e| DomainError::persistence(format!("Lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::persistence_error(response).await);
        }

        let rows: Vec<ItemRow> = response
            .json()
            .await
            .map_err(|e| DomainError::persistence(format!("Malformed lookup response: {}", e)))?;

        Ok(rows.into_iter().next().map(Self::item_from))
    }

    async fn delete(&self, item_id: &str) -> Result<(), DomainError> {
        let response = self
            .client
            .delete(self.table_endpoint())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&[("id", format!("eq.{}", item_id))])
            .send()
            .await
            .map_err(|e| DomainError::persistence(format!("Delete request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::persistence_error(response).await);
        }

        debug!("Deleted item row {}", item_id);
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let match_count = match query.max_results() {
            MaxResults::All => None,
            MaxResults::Limit(n) => Some(n as i64),
        };

        let response = self
            .client
            .post(format!("{}/rest/v1/rpc/match_items", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&json!({
                "query_embedding": query_embedding,
                "match_threshold": query.threshold(),
                "match_count": match_count,
            }))
            .send()
            .await
            .map_err(|e| DomainError::persistence(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::persistence_error(response).await);
        }

        let rows: Vec<MatchRow> = response
            .json()
            .await
            .map_err(|e| DomainError::persistence(format!("Malformed search response: {}", e)))?;

        debug!("match_items returned {} rows", rows.len());

        Ok(rows
            .into_iter()
            .map(|row| SearchResult::new(Self::item_from(row.item), row.similarity))
            .collect())
    }
}
