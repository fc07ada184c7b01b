//! Organization and team membership models, plus the request-scoped context
//! values the tenancy middlewares inject.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A user's role inside an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "org_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Owner,
    Admin,
    Member,
}

impl OrgRole {
    /// Org owners and admins may act on any team in the org without being a
    /// member of it.
    pub fn bypasses_team_membership(&self) -> bool {
        matches!(self, OrgRole::Owner | OrgRole::Admin)
    }
}

/// A user's role inside a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Lead,
    Member,
}

/// Membership row linking a user to an organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrgMembership {
    pub org_id: i64,
    pub user_id: i64,
    pub role: OrgRole,
}

/// A team inside an organization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub id: i64,
    pub org_id: i64,
    pub name: String,
}

/// Membership row linking a user to a team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamMembership {
    pub team_id: i64,
    pub user_id: i64,
    pub role: TeamRole,
}

/// Request-scoped organization context, injected by the org-context
/// middleware and discarded at request end.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrgScope {
    pub org_id: i64,
    pub role: OrgRole,
}

/// Request-scoped team context. `role` is `None` when an org admin acts on a
/// team they are not a member of, or on optional-context read routes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamScope {
    pub team_id: i64,
    pub role: Option<TeamRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_bypass_roles() {
        assert!(OrgRole::Owner.bypasses_team_membership());
        assert!(OrgRole::Admin.bypasses_team_membership());
        assert!(!OrgRole::Member.bypasses_team_membership());
    }
}
