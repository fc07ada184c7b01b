use axum::http::Method;
use axum::routing::get;

use crate::modules::system::controller::health;
use crate::routes::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![RouteSpec {
        method: Method::GET,
        path: "/api/health",
        operation: "public:system:health",
        handler: get(health),
        middlewares: None,
        audited: false,
        summary: "Liveness probe",
        tags: vec!["System"],
    }]
}
