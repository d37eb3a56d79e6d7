use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::connector::api::{ApiError, Container};
use crate::domain::{DomainError, ProcessingStatus};

/// `GET /api/items/{id}/status` — transient progress hint for one ingestion.
pub async fn item_status(
    State(container): State<Arc<Container>>,
    Path(item_id): Path<String>,
) -> Result<Json<ProcessingStatus>, ApiError> {
    let status = container
        .status_registry()
        .get(&item_id)
        .await
        .ok_or_else(|| DomainError::not_found(format!("No status for item: {}", item_id)))?;

    Ok(Json(status))
}
