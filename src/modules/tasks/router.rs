use axum::http::Method;
use axum::routing::{get, post};

use crate::middleware::composer::MiddlewareKind;
use crate::modules::tasks::controller::{create_task, list_tasks};
use crate::routes::RouteSpec;

/// Task routes declare their chains explicitly: reads resolve team context
/// optionally so any org member can browse, writes require strict team
/// membership.
pub fn routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec {
            method: Method::GET,
            path: "/api/orgs/{org_id}/teams/{team_id}/tasks",
            operation: "org:tasks:list",
            handler: get(list_tasks),
            middlewares: Some(vec![
                MiddlewareKind::Auth,
                MiddlewareKind::OrgContext { optional: false },
                MiddlewareKind::TeamContext { optional: true },
                MiddlewareKind::Rbac,
            ]),
            audited: false,
            summary: "List a team's tasks",
            tags: vec!["Tasks"],
        },
        RouteSpec {
            method: Method::POST,
            path: "/api/orgs/{org_id}/teams/{team_id}/tasks",
            operation: "org:tasks:create",
            handler: post(create_task),
            middlewares: Some(vec![
                MiddlewareKind::Auth,
                MiddlewareKind::OrgContext { optional: false },
                MiddlewareKind::TeamContext { optional: false },
                MiddlewareKind::Rbac,
                MiddlewareKind::Audit,
            ]),
            audited: true,
            summary: "Create a task in a team",
            tags: vec!["Tasks"],
        },
    ]
}
