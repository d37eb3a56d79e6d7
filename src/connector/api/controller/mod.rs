pub mod delete_controller;
pub mod search_controller;
pub mod status_controller;
pub mod upload_controller;

pub use delete_controller::delete_item;
pub use search_controller::{search_by_item, search_image, search_text};
pub use status_controller::item_status;
pub use upload_controller::upload_item;

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;

use super::error::ApiError;
use crate::domain::DomainError;

const SESSION_COOKIE: &str = "sb-access-token";

/// Pulls the session token from `Authorization: Bearer …` or the session
/// cookie. Absence is an authentication error before any side effect.
pub(crate) fn session_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    if let Some(cookies) = headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
        for cookie in cookies.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return Ok(value.to_string());
                }
            }
        }
    }

    Err(DomainError::authentication("Missing session token").into())
}
