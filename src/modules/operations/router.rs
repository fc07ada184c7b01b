use axum::http::Method;
use axum::routing::get;

use crate::modules::operations::controller::list_operations;
use crate::routes::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![RouteSpec {
        method: Method::GET,
        path: "/api/operations",
        operation: "admin:operations:list",
        handler: get(list_operations),
        middlewares: None,
        audited: false,
        summary: "List registered operations",
        tags: vec!["Operations"],
    }]
}
