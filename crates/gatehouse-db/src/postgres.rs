//! PostgreSQL store implementation.
//!
//! One [`PostgresStores`] value over a shared pool implements every store
//! trait. Queries use the runtime `query_as` API; membership and permission
//! lookups run on the request task and therefore honor request cancellation,
//! while audit inserts are only ever called from the audit workers.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use gatehouse_auth::PatScope;
use gatehouse_models::audit::{AuditQuery, AuditRecord};
use gatehouse_models::domain::{Role, Task, User};
use gatehouse_models::pats::PatRecord;
use gatehouse_models::tenancy::{OrgMembership, Team, TeamMembership};

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    AuditStore, MembershipStore, PatStore, PermissionSource, RoleStore, TaskStore, UserStore,
};

/// sqlx-backed implementation of every store trait.
#[derive(Debug, Clone)]
pub struct PostgresStores {
    pool: PgPool,
}

impl PostgresStores {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PostgresStores {
    #[instrument(skip(self))]
    async fn org_membership(
        &self,
        org_id: i64,
        user_id: i64,
    ) -> StoreResult<Option<OrgMembership>> {
        let membership = sqlx::query_as::<_, OrgMembership>(
            r#"SELECT org_id, user_id, role
               FROM org_members
               WHERE org_id = $1 AND user_id = $2"#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    #[instrument(skip(self))]
    async fn team(&self, team_id: i64) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"SELECT id, org_id, name FROM teams WHERE id = $1"#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    #[instrument(skip(self))]
    async fn team_membership(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> StoreResult<Option<TeamMembership>> {
        let membership = sqlx::query_as::<_, TeamMembership>(
            r#"SELECT team_id, user_id, role
               FROM team_members
               WHERE team_id = $1 AND user_id = $2"#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }
}

#[async_trait]
impl PermissionSource for PostgresStores {
    #[instrument(skip(self))]
    async fn roles_and_permissions(&self, user_id: i64) -> StoreResult<(Vec<String>, Vec<String>)> {
        let roles = sqlx::query_as::<_, Role>(
            r#"SELECT r.id, r.name, r.permissions
               FROM roles r
               JOIN user_roles ur ON ur.role_id = r.id
               WHERE ur.user_id = $1
               ORDER BY r.id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let names = roles.iter().map(|r| r.name.clone()).collect();
        let mut permissions: Vec<String> = Vec::new();
        for role in &roles {
            for permission in &role.permissions {
                if !permissions.contains(permission) {
                    permissions.push(permission.clone());
                }
            }
        }

        Ok((names, permissions))
    }
}

#[async_trait]
impl PatStore for PostgresStores {
    #[instrument(skip_all)]
    async fn find_by_hash(&self, token_hash: &str) -> StoreResult<Option<PatRecord>> {
        let row = sqlx::query_as::<_, PatRow>(
            r#"SELECT p.id, p.user_id, u.username, p.name, p.scopes, p.expires_at, p.revoked_at
               FROM personal_access_tokens p
               JOIN users u ON u.id = p.user_id
               WHERE p.token_hash = $1"#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PatRow::into_record).transpose()
    }
}

/// Raw PAT row; scopes are stored as text[] and parsed into the enum here so
/// a misissued scope fails the lookup instead of widening access.
#[derive(sqlx::FromRow)]
struct PatRow {
    id: i64,
    user_id: i64,
    username: String,
    name: String,
    scopes: Vec<String>,
    expires_at: Option<chrono::DateTime<Utc>>,
    revoked_at: Option<chrono::DateTime<Utc>>,
}

impl PatRow {
    fn into_record(self) -> StoreResult<PatRecord> {
        let scopes = self
            .scopes
            .iter()
            .map(|s| PatScope::parse(s).ok_or_else(|| StoreError::not_found("pat scope")))
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(PatRecord {
            id: self.id,
            user_id: self.user_id,
            username: self.username,
            name: self.name,
            scopes,
            expires_at: self.expires_at,
            revoked_at: self.revoked_at,
        })
    }
}

#[async_trait]
impl AuditStore for PostgresStores {
    #[instrument(skip_all, fields(operation = %record.operation))]
    async fn insert(&self, record: &AuditRecord) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO audit_records
               (id, user_id, username, action, resource, resource_id, ip_address,
                user_agent, details, status, request_id, operation, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.username)
        .bind(&record.action)
        .bind(&record.resource)
        .bind(&record.resource_id)
        .bind(&record.ip_address)
        .bind(&record.user_agent)
        .bind(&record.details)
        .bind(record.status)
        .bind(&record.request_id)
        .bind(&record.operation)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &AuditQuery) -> StoreResult<Vec<AuditRecord>> {
        let records = sqlx::query_as::<_, AuditRecord>(
            r#"SELECT id, user_id, username, action, resource, resource_id, ip_address,
                      user_agent, details, status, request_id, operation, created_at
               FROM audit_records
               WHERE ($1::text IS NULL OR action = $1)
                 AND ($2::bigint IS NULL OR user_id = $2)
               ORDER BY created_at DESC
               LIMIT $3 OFFSET $4"#,
        )
        .bind(&query.action)
        .bind(query.user_id)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

#[async_trait]
impl UserStore for PostgresStores {
    #[instrument(skip(self))]
    async fn find(&self, user_id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, created_at FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, created_at FROM users ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user"));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleStore for PostgresStores {
    #[instrument(skip(self))]
    async fn find_role(&self, role_id: i64) -> StoreResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            r#"SELECT id, name, permissions FROM roles WHERE id = $1"#,
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role)
    }

    #[instrument(skip(self))]
    async fn assign_role(&self, user_id: i64, role_id: i64) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO user_roles (user_id, role_id)
               VALUES ($1, $2)
               ON CONFLICT DO NOTHING"#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unassign_role(&self, user_id: i64, role_id: i64) -> StoreResult<()> {
        sqlx::query(r#"DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2"#)
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[instrument(skip(self, permissions))]
    async fn set_role_permissions(
        &self,
        role_id: i64,
        permissions: &[String],
    ) -> StoreResult<Vec<i64>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(r#"UPDATE roles SET permissions = $2 WHERE id = $1"#)
            .bind(role_id)
            .bind(permissions)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("role"));
        }

        let holders: Vec<i64> = sqlx::query_scalar(
            r#"SELECT user_id FROM user_roles WHERE role_id = $1 ORDER BY user_id"#,
        )
        .bind(role_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(holders)
    }
}

#[async_trait]
impl TaskStore for PostgresStores {
    #[instrument(skip(self))]
    async fn create(
        &self,
        org_id: i64,
        team_id: i64,
        title: &str,
        created_by: i64,
    ) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"INSERT INTO tasks (org_id, team_id, title, created_by)
               VALUES ($1, $2, $3, $4)
               RETURNING id, org_id, team_id, title, created_by, created_at"#,
        )
        .bind(org_id)
        .bind(team_id)
        .bind(title)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    #[instrument(skip(self))]
    async fn list_for_team(&self, org_id: i64, team_id: i64) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"SELECT id, org_id, team_id, title, created_by, created_at
               FROM tasks
               WHERE org_id = $1 AND team_id = $2
               ORDER BY created_at DESC"#,
        )
        .bind(org_id)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }
}
