//! The process-wide operation registry.
//!
//! Built exactly once at startup from the declared routes and immutable
//! afterwards. The composition root owns the built value behind an `Arc`;
//! replacing the registry means building a fresh one and swapping the `Arc`,
//! so a partially-updated index can never be observed.

use std::collections::HashMap;

use axum::http::Method;

use crate::operation::{Operation, Scope};

/// Route-level facts the registry needs about one declared route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub path: String,
    pub operation: Operation,
    /// Whether a structured audit record is captured for this route.
    pub audited: bool,
    pub summary: &'static str,
    pub tags: Vec<&'static str>,
}

/// Derived, immutable metadata for one operation.
#[derive(Debug, Clone)]
pub struct OperationMeta {
    pub operation: Operation,
    pub method: Method,
    pub path: String,
    /// Audit category, the operation's resource segment.
    pub category: String,
    /// Audit action, the operation's action segment.
    pub audit_action: String,
    pub is_public: bool,
    pub needs_org_context: bool,
    pub needs_team_context: bool,
    pub is_read_only: bool,
    pub audited: bool,
    pub summary: &'static str,
    pub tags: Vec<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate route registration: {method} {path}")]
    DuplicateRoute { method: Method, path: String },
    #[error("duplicate operation registration: {0}")]
    DuplicateOperation(Operation),
    #[error("route {method} {path} has {scope}-scoped operation {operation} but no {{{param}}} path parameter")]
    MissingPathParam {
        method: Method,
        path: String,
        operation: Operation,
        scope: &'static str,
        param: &'static str,
    },
    #[error("public operation {0} must not be flagged for audit")]
    AuditedPublicRoute(Operation),
}

/// Immutable `(method, path) -> Operation` and `Operation -> OperationMeta`
/// index.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    by_route: HashMap<(Method, String), Operation>,
    by_operation: HashMap<Operation, OperationMeta>,
}

impl OperationRegistry {
    /// Builds the full index from the declared routes, atomically: either the
    /// whole registry is valid or startup fails.
    pub fn build(routes: &[RouteEntry]) -> Result<Self, RegistryError> {
        let mut by_route = HashMap::new();
        let mut by_operation = HashMap::new();

        for route in routes {
            let meta = derive_meta(route)?;

            let key = (route.method.clone(), route.path.clone());
            if by_route.contains_key(&key) {
                return Err(RegistryError::DuplicateRoute {
                    method: route.method.clone(),
                    path: route.path.clone(),
                });
            }
            if by_operation.contains_key(&route.operation) {
                return Err(RegistryError::DuplicateOperation(route.operation.clone()));
            }

            by_route.insert(key, route.operation.clone());
            by_operation.insert(route.operation.clone(), meta);
        }

        Ok(Self {
            by_route,
            by_operation,
        })
    }

    pub fn operation_for(&self, method: &Method, path: &str) -> Option<&Operation> {
        self.by_route.get(&(method.clone(), path.to_string()))
    }

    pub fn meta(&self, operation: &Operation) -> Option<&OperationMeta> {
        self.by_operation.get(operation)
    }

    /// All registered operations, for introspection endpoints.
    pub fn operations(&self) -> impl Iterator<Item = &OperationMeta> {
        self.by_operation.values()
    }

    pub fn len(&self) -> usize {
        self.by_operation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_operation.is_empty()
    }
}

fn derive_meta(route: &RouteEntry) -> Result<OperationMeta, RegistryError> {
    let scope = route.operation.scope();
    let is_public = scope == Scope::Public;
    let needs_org_context = matches!(scope, Scope::Org | Scope::Team);
    let needs_team_context = scope == Scope::Team;
    let is_read_only = matches!(route.method, Method::GET | Method::HEAD);

    if is_public && route.audited {
        return Err(RegistryError::AuditedPublicRoute(route.operation.clone()));
    }
    if needs_org_context && !route.path.contains("{org_id}") {
        return Err(RegistryError::MissingPathParam {
            method: route.method.clone(),
            path: route.path.clone(),
            operation: route.operation.clone(),
            scope: scope.as_str(),
            param: "org_id",
        });
    }
    if needs_team_context && !route.path.contains("{team_id}") {
        return Err(RegistryError::MissingPathParam {
            method: route.method.clone(),
            path: route.path.clone(),
            operation: route.operation.clone(),
            scope: scope.as_str(),
            param: "team_id",
        });
    }

    Ok(OperationMeta {
        operation: route.operation.clone(),
        method: route.method.clone(),
        path: route.path.clone(),
        category: route.operation.resource().to_string(),
        audit_action: route.operation.action().to_string(),
        is_public,
        needs_org_context,
        needs_team_context,
        is_read_only,
        audited: route.audited,
        summary: route.summary,
        tags: route.tags.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(method: Method, path: &str, op: &str, audited: bool) -> RouteEntry {
        RouteEntry {
            method,
            path: path.to_string(),
            operation: Operation::parse(op).unwrap(),
            audited,
            summary: "",
            tags: vec![],
        }
    }

    #[test]
    fn test_build_and_lookup() {
        let registry = OperationRegistry::build(&[
            entry(Method::GET, "/api/health", "public:system:health", false),
            entry(
                Method::POST,
                "/api/orgs/{org_id}/teams/{team_id}/tasks",
                "team:tasks:create",
                true,
            ),
        ])
        .unwrap();

        let op = registry
            .operation_for(&Method::GET, "/api/health")
            .unwrap();
        assert_eq!(op.as_str(), "public:system:health");

        let meta = registry
            .meta(&Operation::parse("team:tasks:create").unwrap())
            .unwrap();
        assert!(meta.needs_org_context);
        assert!(meta.needs_team_context);
        assert!(!meta.is_read_only);
        assert!(meta.audited);
        assert_eq!(meta.category, "tasks");
        assert_eq!(meta.audit_action, "create");
    }

    #[test]
    fn test_read_only_from_method() {
        let registry = OperationRegistry::build(&[entry(
            Method::GET,
            "/api/orgs/{org_id}/teams/{team_id}/tasks",
            "team:tasks:list",
            false,
        )])
        .unwrap();

        let meta = registry
            .meta(&Operation::parse("team:tasks:list").unwrap())
            .unwrap();
        assert!(meta.is_read_only);
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let err = OperationRegistry::build(&[
            entry(Method::GET, "/api/users", "admin:users:list", false),
            entry(Method::GET, "/api/users", "admin:users:read", false),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRoute { .. }));
    }

    #[test]
    fn test_duplicate_operation_rejected() {
        let err = OperationRegistry::build(&[
            entry(Method::GET, "/api/users", "admin:users:list", false),
            entry(Method::GET, "/api/members", "admin:users:list", false),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateOperation(_)));
    }

    #[test]
    fn test_org_scope_requires_org_param() {
        let err = OperationRegistry::build(&[entry(
            Method::GET,
            "/api/tasks",
            "org:tasks:list",
            false,
        )])
        .unwrap_err();
        assert!(matches!(err, RegistryError::MissingPathParam { .. }));
    }

    #[test]
    fn test_public_route_cannot_be_audited() {
        let err = OperationRegistry::build(&[entry(
            Method::GET,
            "/api/health",
            "public:system:health",
            true,
        )])
        .unwrap_err();
        assert!(matches!(err, RegistryError::AuditedPublicRoute(_)));
    }
}
