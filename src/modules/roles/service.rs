use std::sync::Arc;

use serde_json::json;

use gatehouse_core::events::{DomainEvent, topics};
use gatehouse_core::{AppError, EventBus};
use gatehouse_db::{RoleStore, UserStore};

pub struct RoleService;

impl RoleService {
    pub async fn assign_role(
        roles: &Arc<dyn RoleStore>,
        users: &Arc<dyn UserStore>,
        events: &EventBus,
        user_id: i64,
        role_id: i64,
    ) -> Result<(), AppError> {
        let role = roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Role {} not found", role_id)))?;
        users
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User {} not found", user_id)))?;

        roles.assign_role(user_id, role_id).await?;

        events.publish(&DomainEvent::new(
            topics::USER_ROLE_ASSIGNED,
            Some(user_id),
            json!({ "role_id": role_id, "role": role.name }),
        ));

        Ok(())
    }

    pub async fn unassign_role(
        roles: &Arc<dyn RoleStore>,
        events: &EventBus,
        user_id: i64,
        role_id: i64,
    ) -> Result<(), AppError> {
        roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Role {} not found", role_id)))?;

        roles.unassign_role(user_id, role_id).await?;

        // Removal changes the user's effective permissions just like a grant.
        events.publish(&DomainEvent::new(
            topics::USER_ROLE_ASSIGNED,
            Some(user_id),
            json!({ "role_id": role_id, "removed": true }),
        ));

        Ok(())
    }

    /// Replaces a role's permission patterns and publishes one invalidation
    /// event per current holder.
    pub async fn update_permissions(
        roles: &Arc<dyn RoleStore>,
        events: &EventBus,
        role_id: i64,
        permissions: Vec<String>,
    ) -> Result<(), AppError> {
        roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Role {} not found", role_id)))?;

        let holders = roles.set_role_permissions(role_id, &permissions).await?;

        for user_id in holders {
            events.publish(&DomainEvent::new(
                topics::ROLE_PERMISSIONS_CHANGED,
                Some(user_id),
                json!({ "role_id": role_id }),
            ));
        }

        Ok(())
    }
}
