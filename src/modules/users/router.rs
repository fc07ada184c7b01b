use axum::http::Method;
use axum::routing::{delete, get};

use crate::modules::users::controller::{delete_user, get_users};
use crate::routes::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec {
            method: Method::GET,
            path: "/api/users",
            operation: "admin:users:list",
            handler: get(get_users),
            middlewares: None,
            audited: false,
            summary: "List user accounts",
            tags: vec!["Users"],
        },
        RouteSpec {
            method: Method::DELETE,
            path: "/api/users/{user_id}",
            operation: "admin:users:delete",
            handler: delete(delete_user),
            middlewares: None,
            audited: true,
            summary: "Delete a user account",
            tags: vec!["Users"],
        },
    ]
}
