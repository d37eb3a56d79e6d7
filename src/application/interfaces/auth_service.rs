use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, DomainError};

/// Resolves a session token into an authenticated identity.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, DomainError>;
}
