use std::sync::Arc;

use serde_json::json;

use gatehouse_core::events::{DomainEvent, topics};
use gatehouse_core::{AppError, EventBus};
use gatehouse_db::UserStore;
use gatehouse_models::domain::User;

pub struct UserService;

impl UserService {
    pub async fn get_users(store: &Arc<dyn UserStore>) -> Result<Vec<User>, AppError> {
        let users = store.list().await?;
        Ok(users)
    }

    /// Deletes a user and publishes `user.deleted` so the permission cache
    /// drops the entry and the audit trail records the change.
    pub async fn delete_user(
        store: &Arc<dyn UserStore>,
        events: &EventBus,
        user_id: i64,
    ) -> Result<(), AppError> {
        let user = store
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User {} not found", user_id)))?;

        store.delete(user_id).await?;

        events.publish(&DomainEvent::new(
            topics::USER_DELETED,
            Some(user_id),
            json!({ "username": user.username }),
        ));

        Ok(())
    }
}
