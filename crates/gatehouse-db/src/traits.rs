//! Store trait definitions.
//!
//! Implementations must be thread-safe (`Send + Sync`) and honor the caller's
//! cancellation: each method awaits on the request task except audit writes,
//! which the audit worker pool calls from its own long-lived tasks.

use async_trait::async_trait;

use gatehouse_models::audit::{AuditQuery, AuditRecord};
use gatehouse_models::domain::{Role, Task, User};
use gatehouse_models::pats::PatRecord;
use gatehouse_models::tenancy::{OrgMembership, Team, TeamMembership};

use crate::error::StoreResult;

/// Organization and team membership lookups for the tenancy middlewares.
#[async_trait]
pub trait MembershipStore: Send + Sync + 'static {
    /// Membership of `user_id` in `org_id`, if any.
    async fn org_membership(&self, org_id: i64, user_id: i64)
    -> StoreResult<Option<OrgMembership>>;

    /// A team by id, regardless of org: the caller checks org ownership.
    async fn team(&self, team_id: i64) -> StoreResult<Option<Team>>;

    /// Membership of `user_id` in `team_id`, if any.
    async fn team_membership(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> StoreResult<Option<TeamMembership>>;
}

/// Source of truth for a user's resolved roles and permissions.
///
/// The permission cache sits in front of this; handlers never call it
/// directly.
#[async_trait]
pub trait PermissionSource: Send + Sync + 'static {
    /// `(role names, permission patterns)` aggregated over the user's roles.
    async fn roles_and_permissions(&self, user_id: i64) -> StoreResult<(Vec<String>, Vec<String>)>;
}

/// Personal access token lookups.
#[async_trait]
pub trait PatStore: Send + Sync + 'static {
    /// Finds a token by its SHA-256 hex digest. Revocation and expiry are the
    /// caller's checks so that the 401 stays uniform.
    async fn find_by_hash(&self, token_hash: &str) -> StoreResult<Option<PatRecord>>;
}

/// Append-only audit persistence.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    async fn insert(&self, record: &AuditRecord) -> StoreResult<()>;

    async fn list(&self, query: &AuditQuery) -> StoreResult<Vec<AuditRecord>>;
}

/// User accounts, for the representative admin module.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    async fn find(&self, user_id: i64) -> StoreResult<Option<User>>;

    async fn list(&self) -> StoreResult<Vec<User>>;

    async fn delete(&self, user_id: i64) -> StoreResult<()>;
}

/// Role assignment, for the representative roles module.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    async fn find_role(&self, role_id: i64) -> StoreResult<Option<Role>>;

    async fn assign_role(&self, user_id: i64, role_id: i64) -> StoreResult<()>;

    async fn unassign_role(&self, user_id: i64, role_id: i64) -> StoreResult<()>;

    /// Replaces a role's permission patterns and returns the ids of users
    /// holding the role, so the caller can publish per-user events.
    async fn set_role_permissions(
        &self,
        role_id: i64,
        permissions: &[String],
    ) -> StoreResult<Vec<i64>>;
}

/// Team tasks, for the representative org/team-scoped module.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn create(
        &self,
        org_id: i64,
        team_id: i64,
        title: &str,
        created_by: i64,
    ) -> StoreResult<Task>;

    async fn list_for_team(&self, org_id: i64, team_id: i64) -> StoreResult<Vec<Task>>;
}
