use axum::http::Method;
use axum::routing::get;

use crate::modules::audit::controller::list_audit_records;
use crate::routes::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![RouteSpec {
        method: Method::GET,
        path: "/api/audit",
        operation: "admin:audit:list",
        handler: get(list_audit_records),
        middlewares: None,
        audited: false,
        summary: "List audit records",
        tags: vec!["Audit"],
    }]
}
