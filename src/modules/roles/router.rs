use axum::http::Method;
use axum::routing::{delete, post, put};

use crate::modules::roles::controller::{assign_role, unassign_role, update_role_permissions};
use crate::routes::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec {
            method: Method::POST,
            path: "/api/users/{user_id}/roles/{role_id}",
            operation: "admin:roles:assign",
            handler: post(assign_role),
            middlewares: None,
            audited: true,
            summary: "Assign a role to a user",
            tags: vec!["Roles"],
        },
        RouteSpec {
            method: Method::DELETE,
            path: "/api/users/{user_id}/roles/{role_id}",
            operation: "admin:roles:unassign",
            handler: delete(unassign_role),
            middlewares: None,
            audited: true,
            summary: "Remove a role from a user",
            tags: vec!["Roles"],
        },
        RouteSpec {
            method: Method::PUT,
            path: "/api/roles/{role_id}/permissions",
            operation: "admin:roles:update_permissions",
            handler: put(update_role_permissions),
            middlewares: None,
            audited: true,
            summary: "Replace a role's permission patterns",
            tags: vec!["Roles"],
        },
    ]
}
