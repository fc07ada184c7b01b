use std::sync::Arc;

use gatehouse_auth::JwtConfig;
use gatehouse_cache::{CacheConfig, PermissionService, register_invalidation};
use gatehouse_core::{EventBus, OperationRegistry};
use gatehouse_db::postgres::PostgresStores;
use gatehouse_db::{
    AuditStore, MembershipStore, PatStore, RoleStore, TaskStore, UserStore, init_db_pool,
};

use crate::audit::{AuditHandle, register_event_audit, spawn_audit_workers};
use crate::config::audit::AuditConfig;
use crate::config::cors::CorsConfig;

/// Shared application state.
///
/// Store handles are trait objects so the integration tests can swap the
/// Postgres stores for in-memory ones without touching the pipeline.
#[derive(Clone)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub registry: Arc<OperationRegistry>,
    pub events: Arc<EventBus>,
    pub permissions: Arc<PermissionService>,
    pub memberships: Arc<dyn MembershipStore>,
    pub pats: Arc<dyn PatStore>,
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub audit_store: Arc<dyn AuditStore>,
    pub audit: AuditHandle,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Builds production state over Postgres stores. The registry is built by the
/// caller from the declared routes before state construction, so the index is
/// complete before the first request.
pub async fn init_app_state(registry: Arc<OperationRegistry>) -> AppState {
    let pool = init_db_pool().await;
    let stores = Arc::new(PostgresStores::new(pool));

    build_app_state(
        registry,
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores.clone(),
        stores,
    )
}

/// Wires state from individual store handles: permission cache over the
/// source of truth, invalidation subscribers, audit worker pool, and the
/// wildcard audit-from-events subscriber.
#[allow(clippy::too_many_arguments)]
pub fn build_app_state(
    registry: Arc<OperationRegistry>,
    memberships: Arc<dyn MembershipStore>,
    pats: Arc<dyn PatStore>,
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    tasks: Arc<dyn TaskStore>,
    permission_source: Arc<dyn gatehouse_db::PermissionSource>,
    audit_store: Arc<dyn AuditStore>,
) -> AppState {
    let events = Arc::new(EventBus::new());
    let permissions = Arc::new(PermissionService::new(
        &CacheConfig::from_env(),
        permission_source,
    ));
    register_invalidation(&events, permissions.cache());

    let audit_config = AuditConfig::from_env();
    let audit = spawn_audit_workers(audit_store.clone(), &audit_config);
    register_event_audit(&events, audit.clone());

    AppState {
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        registry,
        events,
        permissions,
        memberships,
        pats,
        users,
        roles,
        tasks,
        audit_store,
        audit,
    }
}
