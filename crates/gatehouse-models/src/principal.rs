//! The authenticated actor for a request.

use gatehouse_core::operation::any_matches;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How the request authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Jwt,
    Pat,
}

/// Request-scoped principal injected by the auth middleware and read by
/// RBAC, audit capture, and handlers.
///
/// For PAT-authenticated requests `permissions` is already the scope-filtered
/// effective set, a strict subset of the user's full permissions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub auth_type: AuthType,
}

impl CurrentUser {
    /// True if any effective permission pattern grants the operation.
    pub fn can(&self, operation: &str) -> bool {
        any_matches(&self.permissions, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_applies_wildcard_patterns() {
        let user = CurrentUser {
            user_id: 1,
            username: "ada".into(),
            roles: vec!["admin".into()],
            permissions: vec!["admin:*:*".into(), "self:profile:get".into()],
            auth_type: AuthType::Jwt,
        };

        assert!(user.can("admin:users:create"));
        assert!(user.can("self:profile:get"));
        assert!(!user.can("org:tasks:create"));
    }
}
