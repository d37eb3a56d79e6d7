use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::session_token;
use crate::connector::api::{ApiError, Container};
use crate::domain::{DomainError, ItemSubmission};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub item_id: String,
    pub image_url: String,
    /// Seconds spent handling the submission.
    pub processing_time: f64,
}

/// `POST /api/items` — multipart `{title, description?, location, image}`.
pub async fn upload_item(
    State(container): State<Arc<Container>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    // Authentication comes before reading the form: no session, no side effects.
    let token = session_token(&headers)?;
    let user = container.auth_service().authenticate(&token).await?;

    let submission = read_submission(multipart).await?;

    let receipt = container
        .ingest_use_case()
        .execute(&user, submission)
        .await?;

    Ok(Json(UploadResponse {
        success: true,
        item_id: receipt.item_id,
        image_url: receipt.image_url,
        processing_time: receipt.elapsed.as_secs_f64(),
    }))
}

async fn read_submission(mut multipart: Multipart) -> Result<ItemSubmission, ApiError> {
    let mut title = String::new();
    let mut description = None;
    let mut location = String::new();
    let mut file_name = String::new();
    let mut content_type = "application/octet-stream".to_string();
    let mut image = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::validation(format!("Malformed multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "title" => title = read_text(field).await?,
            "description" => description = Some(read_text(field).await?),
            "location" => location = read_text(field).await?,
            "image" => {
                file_name = field.file_name().unwrap_or("upload").to_string();
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                image = field
                    .bytes()
                    .await
                    .map_err(|e| DomainError::validation(format!("Failed to read image: {}", e)))?
                    .to_vec();
            }
            other => {
                // Unknown fields are ignored rather than rejected.
                tracing::debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    Ok(ItemSubmission {
        title,
        description,
        location,
        file_name,
        content_type,
        image,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| DomainError::validation(format!("Malformed form field: {}", e)).into())
}
