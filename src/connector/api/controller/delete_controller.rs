use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::session_token;
use crate::connector::api::{ApiError, Container};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub item_id: String,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// `POST /api/items/delete` — owner or admin only.
pub async fn delete_item(
    State(container): State<Arc<Container>>,
    headers: HeaderMap,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let token = session_token(&headers)?;
    let user = container.auth_service().authenticate(&token).await?;

    container
        .delete_use_case()
        .execute(&user, &request.item_id, &request.file_name)
        .await?;

    Ok(Json(DeleteResponse { success: true }))
}
