use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::application::AuthService;
use crate::domain::{AuthenticatedUser, DomainError};

/// Session verification against the Supabase GoTrue endpoint.
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    role: Option<String>,
}

impl SupabaseAuth {
    pub fn new(client: Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }
}

#[async_trait]
impl AuthService for SupabaseAuth {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        if token.is_empty() {
            return Err(DomainError::authentication("Missing session token"));
        }

        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DomainError::authentication(format!("Auth request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            debug!("Session rejected by auth provider: {}", status);
            return Err(DomainError::authentication(format!(
                "Invalid session ({})",
                status
            )));
        }

        let user: GoTrueUser = response
            .json()
            .await
            .map_err(|e| DomainError::authentication(format!("Malformed auth response: {}", e)))?;

        Ok(AuthenticatedUser::new(
            user.id,
            user.email,
            user.app_metadata
                .role
                .unwrap_or_else(|| "authenticated".to_string()),
        ))
    }
}
