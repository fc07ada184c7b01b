//! Event-driven cache invalidation.
//!
//! The CRUD layer publishes domain events after committing writes; these
//! subscribers translate them into unconditional cache evictions. There is no
//! selective patching: concurrent writers would otherwise race to compute
//! inconsistent partial states.

use std::sync::Arc;

use tracing::warn;

use gatehouse_core::events::{EventBus, topics};

use crate::permissions::PermissionCache;

/// Registers eviction handlers for every event that can change a user's
/// resolved permissions. Called once at startup.
pub fn register_invalidation(bus: &EventBus, cache: Arc<PermissionCache>) {
    for topic in [
        topics::USER_ROLE_ASSIGNED,
        topics::USER_DELETED,
        topics::ROLE_PERMISSIONS_CHANGED,
    ] {
        let cache = cache.clone();
        bus.subscribe(topic, move |event| match event.user_id {
            Some(user_id) => cache.evict(user_id),
            None => {
                // Without an affected user the only safe move is dropping
                // everything.
                warn!(topic = %event.topic, "Invalidation event without user_id, clearing cache");
                cache.clear();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::CachedPermissions;
    use gatehouse_core::events::DomainEvent;
    use serde_json::json;
    use std::time::Duration;

    fn cached() -> CachedPermissions {
        CachedPermissions {
            roles: vec!["member".into()],
            permissions: vec!["org:tasks:list".into()],
        }
    }

    #[test]
    fn test_role_assignment_evicts_user() {
        let bus = EventBus::new();
        let cache = Arc::new(PermissionCache::new(Duration::from_secs(60)));
        register_invalidation(&bus, cache.clone());

        cache.insert(7, cached());
        cache.insert(8, cached());

        bus.publish(&DomainEvent::new(
            topics::USER_ROLE_ASSIGNED,
            Some(7),
            json!({ "role_id": 2 }),
        ));

        assert!(cache.get(7).is_none());
        assert!(cache.get(8).is_some());
    }

    #[test]
    fn test_all_invalidation_topics_evict() {
        for topic in [
            topics::USER_ROLE_ASSIGNED,
            topics::USER_DELETED,
            topics::ROLE_PERMISSIONS_CHANGED,
        ] {
            let bus = EventBus::new();
            let cache = Arc::new(PermissionCache::new(Duration::from_secs(60)));
            register_invalidation(&bus, cache.clone());

            cache.insert(7, cached());
            bus.publish(&DomainEvent::new(topic, Some(7), serde_json::Value::Null));
            assert!(cache.get(7).is_none(), "topic {topic} did not evict");
        }
    }

    #[test]
    fn test_event_without_user_clears_everything() {
        let bus = EventBus::new();
        let cache = Arc::new(PermissionCache::new(Duration::from_secs(60)));
        register_invalidation(&bus, cache.clone());

        cache.insert(7, cached());
        cache.insert(8, cached());

        bus.publish(&DomainEvent::new(
            topics::ROLE_PERMISSIONS_CHANGED,
            None,
            serde_json::Value::Null,
        ));

        assert!(cache.is_empty());
    }

    #[test]
    fn test_unrelated_events_do_not_evict() {
        let bus = EventBus::new();
        let cache = Arc::new(PermissionCache::new(Duration::from_secs(60)));
        register_invalidation(&bus, cache.clone());

        cache.insert(7, cached());
        bus.publish(&DomainEvent::new(
            "task.created",
            Some(7),
            serde_json::Value::Null,
        ));

        assert!(cache.get(7).is_some());
    }
}
