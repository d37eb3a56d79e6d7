use serde::{Deserialize, Serialize};

/// Identity resolved from the session token by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    id: String,
    email: Option<String>,
    role: String,
}

impl AuthenticatedUser {
    pub fn new(id: String, email: Option<String>, role: String) -> Self {
        Self { id, email, role }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Privileged accounts may delete items they do not own.
    pub fn is_admin(&self) -> bool {
        matches!(self.role.as_str(), "admin" | "service_role")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_roles() {
        let admin =
            AuthenticatedUser::new("u1".to_string(), None, "admin".to_string());
        let service =
            AuthenticatedUser::new("u2".to_string(), None, "service_role".to_string());
        let plain = AuthenticatedUser::new(
            "u3".to_string(),
            Some("x@example.com".to_string()),
            "authenticated".to_string(),
        );

        assert!(admin.is_admin());
        assert!(service.is_admin());
        assert!(!plain.is_admin());
    }
}
