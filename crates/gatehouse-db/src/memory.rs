//! In-memory store implementation for tests and local development.
//!
//! One [`MemoryStores`] value implements every store trait; an `Arc` of it
//! can be coerced into each `Arc<dyn ...>` slot of the app state. All maps
//! are guarded by `std::sync::RwLock` since no lock is held across an await.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use gatehouse_models::audit::{AuditQuery, AuditRecord};
use gatehouse_models::domain::{Role, Task, User};
use gatehouse_models::pats::PatRecord;
use gatehouse_models::tenancy::{OrgMembership, OrgRole, Team, TeamMembership, TeamRole};

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    AuditStore, MembershipStore, PatStore, PermissionSource, RoleStore, TaskStore, UserStore,
};

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStores {
    users: RwLock<HashMap<i64, User>>,
    roles: RwLock<HashMap<i64, Role>>,
    user_roles: RwLock<Vec<(i64, i64)>>,
    org_memberships: RwLock<Vec<OrgMembership>>,
    teams: RwLock<HashMap<i64, Team>>,
    team_memberships: RwLock<Vec<TeamMembership>>,
    pats: RwLock<HashMap<String, PatRecord>>,
    audits: RwLock<Vec<AuditRecord>>,
    tasks: RwLock<Vec<Task>>,
    next_task_id: AtomicI64,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self {
            next_task_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    // Seeding helpers.

    pub fn add_user(&self, id: i64, username: &str) {
        self.users.write().unwrap().insert(
            id,
            User {
                id,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                created_at: Utc::now(),
            },
        );
    }

    pub fn add_role(&self, id: i64, name: &str, permissions: &[&str]) {
        self.roles.write().unwrap().insert(
            id,
            Role {
                id,
                name: name.to_string(),
                permissions: permissions.iter().map(|p| p.to_string()).collect(),
            },
        );
    }

    pub fn grant_role(&self, user_id: i64, role_id: i64) {
        self.user_roles.write().unwrap().push((user_id, role_id));
    }

    pub fn add_org_member(&self, org_id: i64, user_id: i64, role: OrgRole) {
        self.org_memberships.write().unwrap().push(OrgMembership {
            org_id,
            user_id,
            role,
        });
    }

    pub fn add_team(&self, id: i64, org_id: i64, name: &str) {
        self.teams.write().unwrap().insert(
            id,
            Team {
                id,
                org_id,
                name: name.to_string(),
            },
        );
    }

    pub fn add_team_member(&self, team_id: i64, user_id: i64, role: TeamRole) {
        self.team_memberships.write().unwrap().push(TeamMembership {
            team_id,
            user_id,
            role,
        });
    }

    pub fn add_pat(&self, token_hash: &str, record: PatRecord) {
        self.pats
            .write()
            .unwrap()
            .insert(token_hash.to_string(), record);
    }

    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.audits.read().unwrap().clone()
    }
}

#[async_trait]
impl MembershipStore for MemoryStores {
    async fn org_membership(
        &self,
        org_id: i64,
        user_id: i64,
    ) -> StoreResult<Option<OrgMembership>> {
        Ok(self
            .org_memberships
            .read()
            .unwrap()
            .iter()
            .find(|m| m.org_id == org_id && m.user_id == user_id)
            .cloned())
    }

    async fn team(&self, team_id: i64) -> StoreResult<Option<Team>> {
        Ok(self.teams.read().unwrap().get(&team_id).cloned())
    }

    async fn team_membership(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> StoreResult<Option<TeamMembership>> {
        Ok(self
            .team_memberships
            .read()
            .unwrap()
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl PermissionSource for MemoryStores {
    async fn roles_and_permissions(&self, user_id: i64) -> StoreResult<(Vec<String>, Vec<String>)> {
        let role_ids: Vec<i64> = self
            .user_roles
            .read()
            .unwrap()
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, rid)| *rid)
            .collect();

        let roles = self.roles.read().unwrap();
        let mut names = Vec::new();
        let mut permissions = Vec::new();
        for role_id in role_ids {
            if let Some(role) = roles.get(&role_id) {
                names.push(role.name.clone());
                for permission in &role.permissions {
                    if !permissions.contains(permission) {
                        permissions.push(permission.clone());
                    }
                }
            }
        }

        Ok((names, permissions))
    }
}

#[async_trait]
impl PatStore for MemoryStores {
    async fn find_by_hash(&self, token_hash: &str) -> StoreResult<Option<PatRecord>> {
        Ok(self.pats.read().unwrap().get(token_hash).cloned())
    }
}

#[async_trait]
impl AuditStore for MemoryStores {
    async fn insert(&self, record: &AuditRecord) -> StoreResult<()> {
        self.audits.write().unwrap().push(record.clone());
        Ok(())
    }

    async fn list(&self, query: &AuditQuery) -> StoreResult<Vec<AuditRecord>> {
        let audits = self.audits.read().unwrap();
        let records = audits
            .iter()
            .rev()
            .filter(|r| {
                query.action.as_ref().is_none_or(|a| &r.action == a)
                    && query.user_id.is_none_or(|uid| r.user_id == uid)
            })
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .cloned()
            .collect();
        Ok(records)
    }
}

#[async_trait]
impl UserStore for MemoryStores {
    async fn find(&self, user_id: i64) -> StoreResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&user_id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn delete(&self, user_id: i64) -> StoreResult<()> {
        let removed = self.users.write().unwrap().remove(&user_id);
        if removed.is_none() {
            return Err(StoreError::not_found("user"));
        }
        self.user_roles
            .write()
            .unwrap()
            .retain(|(uid, _)| *uid != user_id);
        Ok(())
    }
}

#[async_trait]
impl RoleStore for MemoryStores {
    async fn find_role(&self, role_id: i64) -> StoreResult<Option<Role>> {
        Ok(self.roles.read().unwrap().get(&role_id).cloned())
    }

    async fn assign_role(&self, user_id: i64, role_id: i64) -> StoreResult<()> {
        if !self.roles.read().unwrap().contains_key(&role_id) {
            return Err(StoreError::not_found("role"));
        }
        let mut user_roles = self.user_roles.write().unwrap();
        if !user_roles.contains(&(user_id, role_id)) {
            user_roles.push((user_id, role_id));
        }
        Ok(())
    }

    async fn unassign_role(&self, user_id: i64, role_id: i64) -> StoreResult<()> {
        self.user_roles
            .write()
            .unwrap()
            .retain(|pair| *pair != (user_id, role_id));
        Ok(())
    }

    async fn set_role_permissions(
        &self,
        role_id: i64,
        permissions: &[String],
    ) -> StoreResult<Vec<i64>> {
        let mut roles = self.roles.write().unwrap();
        let role = roles
            .get_mut(&role_id)
            .ok_or_else(|| StoreError::not_found("role"))?;
        role.permissions = permissions.to_vec();

        let holders = self
            .user_roles
            .read()
            .unwrap()
            .iter()
            .filter(|(_, rid)| *rid == role_id)
            .map(|(uid, _)| *uid)
            .collect();
        Ok(holders)
    }
}

#[async_trait]
impl TaskStore for MemoryStores {
    async fn create(
        &self,
        org_id: i64,
        team_id: i64,
        title: &str,
        created_by: i64,
    ) -> StoreResult<Task> {
        let task = Task {
            id: self.next_task_id.fetch_add(1, Ordering::SeqCst),
            org_id,
            team_id,
            title: title.to_string(),
            created_by,
            created_at: Utc::now(),
        };
        self.tasks.write().unwrap().push(task.clone());
        Ok(task)
    }

    async fn list_for_team(&self, org_id: i64, team_id: i64) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| t.org_id == org_id && t.team_id == team_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permissions_aggregate_over_roles() {
        let stores = MemoryStores::new();
        stores.add_role(1, "org_member", &["org:tasks:list", "self:profile:get"]);
        stores.add_role(2, "task_writer", &["org:tasks:create", "org:tasks:list"]);
        stores.grant_role(7, 1);
        stores.grant_role(7, 2);

        let (roles, permissions) = stores.roles_and_permissions(7).await.unwrap();
        assert_eq!(roles, vec!["org_member", "task_writer"]);
        // De-duplicated union.
        assert_eq!(permissions.len(), 3);
        assert!(permissions.contains(&"org:tasks:create".to_string()));
    }

    #[tokio::test]
    async fn test_delete_user_clears_role_links() {
        let stores = MemoryStores::new();
        stores.add_user(7, "ada");
        stores.add_role(1, "admin", &["admin:*:*"]);
        stores.grant_role(7, 1);

        stores.delete(7).await.unwrap();
        let (roles, permissions) = stores.roles_and_permissions(7).await.unwrap();
        assert!(roles.is_empty());
        assert!(permissions.is_empty());
    }

    #[tokio::test]
    async fn test_set_role_permissions_returns_holders() {
        let stores = MemoryStores::new();
        stores.add_role(1, "viewer", &["org:tasks:list"]);
        stores.grant_role(3, 1);
        stores.grant_role(4, 1);

        let holders = stores
            .set_role_permissions(1, &["org:tasks:list".to_string(), "org:tasks:create".into()])
            .await
            .unwrap();
        assert_eq!(holders, vec![3, 4]);
    }
}
