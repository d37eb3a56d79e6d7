use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::application::AuthService;
use crate::domain::{AuthenticatedUser, DomainError};

/// Token-to-user map for dev mode and tests. No external auth provider is
/// contacted; unknown tokens are rejected unless permissive mode is on.
pub struct StaticAuth {
    users: HashMap<String, AuthenticatedUser>,
    permissive: bool,
}

impl StaticAuth {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            permissive: false,
        }
    }

    /// Dev-server mode: any non-empty token authenticates as a user whose id is
    /// the token itself.
    pub fn permissive() -> Self {
        Self {
            users: HashMap::new(),
            permissive: true,
        }
    }

    pub fn with_user(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.users.insert(token.into(), user);
        self
    }
}

impl Default for StaticAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthService for StaticAuth {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        if token.is_empty() {
            return Err(DomainError::authentication("Missing session token"));
        }

        if let Some(user) = self.users.get(token) {
            return Ok(user.clone());
        }

        if self.permissive {
            debug!("Permissive auth: accepting token as user id");
            return Ok(AuthenticatedUser::new(
                token.to_string(),
                None,
                "authenticated".to_string(),
            ));
        }

        Err(DomainError::authentication("Invalid session token"))
    }
}
