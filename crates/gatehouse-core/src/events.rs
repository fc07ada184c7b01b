//! In-process domain event bus.
//!
//! CRUD services publish named events after a committing write; subscribers
//! are registered once at startup. Dispatch is a synchronous call-through on
//! the publisher's task, so handlers must stay cheap (the permission-cache
//! eviction handler is an O(1) map delete). A subscriber registered on the
//! `"*"` topic receives every event; the audit pipeline uses this to capture
//! domain changes that did not arrive over HTTP.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// Topic names published by the CRUD layer.
pub mod topics {
    /// A role was assigned to or removed from a user. Payload carries `user_id`.
    pub const USER_ROLE_ASSIGNED: &str = "user.role_assigned";
    /// A user account was deleted. Payload carries `user_id`.
    pub const USER_DELETED: &str = "user.deleted";
    /// A role's permission set changed. Payload carries affected `user_id`s
    /// as separate events per user.
    pub const ROLE_PERMISSIONS_CHANGED: &str = "role.permissions_changed";
    /// Wildcard topic matching every published event.
    pub const WILDCARD: &str = "*";
}

/// One domain event. The affected `user_id` is lifted out of the payload
/// because every invalidation subscriber keys on it.
#[derive(Debug, Clone)]
pub struct DomainEvent {
    pub topic: String,
    pub user_id: Option<i64>,
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    pub fn new(topic: &str, user_id: Option<i64>, payload: Value) -> Self {
        Self {
            topic: topic.to_string(),
            user_id,
            payload,
            occurred_at: Utc::now(),
        }
    }
}

type Handler = Arc<dyn Fn(&DomainEvent) + Send + Sync>;

/// Topic-keyed subscriber registry with synchronous dispatch.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<String, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a topic. `topics::WILDCARD` subscribes to all
    /// events.
    pub fn subscribe<F>(&self, topic: &str, handler: F)
    where
        F: Fn(&DomainEvent) + Send + Sync + 'static,
    {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers
            .entry(topic.to_string())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Dispatches the event to exact-topic subscribers, then wildcard
    /// subscribers, on the calling task.
    pub fn publish(&self, event: &DomainEvent) {
        debug!(topic = %event.topic, user_id = ?event.user_id, "Publishing domain event");

        let handlers: Vec<Handler> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let exact = subscribers.get(&event.topic).into_iter().flatten();
            let wildcard = subscribers.get(topics::WILDCARD).into_iter().flatten();
            exact.chain(wildcard).cloned().collect()
        };

        for handler in handlers {
            handler(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let topics: Vec<String> = self
            .subscribers
            .read()
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("EventBus").field("topics", &topics).finish()
    }
}
