use serde::{Deserialize, Serialize};

/// Lifecycle of an ingestion request, as seen by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingState {
    Processing,
    Complete,
    Error,
}

impl ProcessingState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingState::Complete | ProcessingState::Error)
    }
}

/// Transient, non-authoritative progress record for one item. The database row
/// is the source of truth; this only feeds optional polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingStatus {
    item_id: String,
    state: ProcessingState,
    message: String,
    updated_at: i64,
}

impl ProcessingStatus {
    pub fn processing(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_state(item_id, ProcessingState::Processing, message)
    }

    pub fn complete(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_state(item_id, ProcessingState::Complete, message)
    }

    pub fn error(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_state(item_id, ProcessingState::Error, message)
    }

    fn with_state(
        item_id: impl Into<String>,
        state: ProcessingState,
        message: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            state,
            message: message.into(),
            updated_at: current_timestamp(),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn state(&self) -> ProcessingState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
}

fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
