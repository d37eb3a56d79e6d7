use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::container::Container;
use super::controller::{
    delete_item, item_status, search_by_item, search_image, search_text, upload_item,
};

/// Uploads carry a full-resolution photo; cap the body well above typical
/// camera output.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(container: Arc<Container>) -> Router {
    Router::new()
        .route("/api/items", post(upload_item))
        .route("/api/items/{id}/status", get(item_status))
        .route("/api/items/delete", post(delete_item))
        .route("/api/search/text", post(search_text))
        .route("/api/search/image", post(search_image))
        .route("/api/search/item", post(search_by_item))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(container)
}
