//! Per-user permission cache and the cache-aside resolution service.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use gatehouse_db::error::StoreResult;
use gatehouse_db::traits::PermissionSource;

use crate::config::CacheConfig;

/// A user's resolved roles and permission patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPermissions {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone)]
struct Entry {
    value: CachedPermissions,
    inserted_at: Instant,
}

/// Concurrent per-user cache.
///
/// Entries are written only by full replacement and removed only by whole-key
/// eviction, so readers can never observe a partially-updated permission set.
/// The TTL is a backstop against lost invalidation events, not the primary
/// consistency mechanism.
#[derive(Debug)]
pub struct PermissionCache {
    entries: RwLock<HashMap<i64, Entry>>,
    ttl: Duration,
}

impl PermissionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, user_id: i64) -> Option<CachedPermissions> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = entries.get(&user_id)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn insert(&self, user_id: i64, value: CachedPermissions) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(
            user_id,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Unconditional delete. O(1), safe to call from synchronous event
    /// handlers on the publisher's task.
    pub fn evict(&self, user_id: i64) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if entries.remove(&user_id).is_some() {
            debug!(user_id, "Evicted cached permissions");
        }
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache-aside permission resolution: check the cache, fall through to the
/// source of truth on a miss, populate, return.
pub struct PermissionService {
    cache: Arc<PermissionCache>,
    source: Arc<dyn PermissionSource>,
}

impl PermissionService {
    pub fn new(config: &CacheConfig, source: Arc<dyn PermissionSource>) -> Self {
        Self {
            cache: Arc::new(PermissionCache::new(config.ttl)),
            source,
        }
    }

    pub fn cache(&self) -> Arc<PermissionCache> {
        self.cache.clone()
    }

    pub async fn user_permissions(&self, user_id: i64) -> StoreResult<CachedPermissions> {
        if let Some(cached) = self.cache.get(user_id) {
            debug!(user_id, "Permission cache hit");
            return Ok(cached);
        }

        debug!(user_id, "Permission cache miss");
        let (roles, permissions) = self.source.roles_and_permissions(user_id).await?;
        let resolved = CachedPermissions { roles, permissions };
        self.cache.insert(user_id, resolved.clone());
        Ok(resolved)
    }
}

impl std::fmt::Debug for PermissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionService")
            .field("cached_users", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl PermissionSource for CountingSource {
        async fn roles_and_permissions(
            &self,
            user_id: i64,
        ) -> StoreResult<(Vec<String>, Vec<String>)> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok((
                vec![format!("role-{user_id}")],
                vec!["self:profile:get".to_string()],
            ))
        }
    }

    #[tokio::test]
    async fn test_cache_aside_avoids_second_lookup() {
        let source = Arc::new(CountingSource {
            lookups: AtomicUsize::new(0),
        });
        let service = PermissionService::new(&CacheConfig::default(), source.clone());

        service.user_permissions(7).await.unwrap();
        service.user_permissions(7).await.unwrap();

        assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_eviction_forces_fresh_lookup() {
        let source = Arc::new(CountingSource {
            lookups: AtomicUsize::new(0),
        });
        let service = PermissionService::new(&CacheConfig::default(), source.clone());

        service.user_permissions(7).await.unwrap();
        service.cache().evict(7);
        service.user_permissions(7).await.unwrap();

        assert_eq!(source.lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_ttl_backstop_expires_entries() {
        let cache = PermissionCache::new(Duration::ZERO);
        cache.insert(
            1,
            CachedPermissions {
                roles: vec![],
                permissions: vec![],
            },
        );
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn test_insert_is_full_replacement() {
        let cache = PermissionCache::new(Duration::from_secs(60));
        cache.insert(
            1,
            CachedPermissions {
                roles: vec!["a".into()],
                permissions: vec!["org:tasks:list".into()],
            },
        );
        cache.insert(
            1,
            CachedPermissions {
                roles: vec!["b".into()],
                permissions: vec![],
            },
        );

        let entry = cache.get(1).unwrap();
        assert_eq!(entry.roles, vec!["b"]);
        assert!(entry.permissions.is_empty());
    }
}
