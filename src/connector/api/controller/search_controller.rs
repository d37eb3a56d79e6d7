use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::connector::api::{ApiError, Container};
use crate::domain::{DomainError, MaxResults, SearchQuery, SearchResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchRequest {
    pub query: String,
    pub threshold: f32,
    pub max_results: Option<MaxResults>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearchRequest {
    pub item_id: String,
    pub threshold: f32,
    pub max_results: Option<MaxResults>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub items: Vec<SearchResult>,
}

/// `POST /api/search/text` — JSON `{query, threshold, maxResults?}`.
pub async fn search_text(
    State(container): State<Arc<Container>>,
    Json(request): Json<TextSearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = SearchQuery::new(
        request.threshold,
        request.max_results.unwrap_or(MaxResults::All),
    );

    let items = container
        .search_use_case()
        .search_text(&request.query, query)
        .await?;

    Ok(Json(SearchResponse { items }))
}

/// `POST /api/search/image` — multipart `{image, threshold, maxResults}`.
pub async fn search_image(
    State(container): State<Arc<Container>>,
    mut multipart: Multipart,
) -> Result<Json<SearchResponse>, ApiError> {
    let mut image = Vec::new();
    let mut threshold: Option<f32> = None;
    let mut max_results = MaxResults::All;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::validation(format!("Malformed multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "image" => {
                image = field
                    .bytes()
                    .await
                    .map_err(|e| DomainError::validation(format!("Failed to read image: {}", e)))?
                    .to_vec();
            }
            "threshold" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| DomainError::validation(format!("Malformed form field: {}", e)))?;
                threshold = Some(raw.trim().parse::<f32>().map_err(|_| {
                    DomainError::validation(format!("threshold must be numeric, got: {}", raw))
                })?);
            }
            "maxResults" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| DomainError::validation(format!("Malformed form field: {}", e)))?;
                max_results = MaxResults::parse(&raw)?;
            }
            _ => {}
        }
    }

    let threshold = threshold
        .ok_or_else(|| DomainError::validation("Missing required field: threshold"))?;
    let query = SearchQuery::new(threshold, max_results);

    let items = container
        .search_use_case()
        .search_image(&image, query)
        .await?;

    Ok(Json(SearchResponse { items }))
}

/// `POST /api/search/item` — search with the stored image of an existing item.
pub async fn search_by_item(
    State(container): State<Arc<Container>>,
    Json(request): Json<ItemSearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = SearchQuery::new(
        request.threshold,
        request.max_results.unwrap_or(MaxResults::All),
    );

    let items = container
        .search_use_case()
        .search_by_item(&request.item_id, query)
        .await?;

    Ok(Json(SearchResponse { items }))
}
