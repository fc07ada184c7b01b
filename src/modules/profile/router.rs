use axum::http::Method;
use axum::routing::get;

use crate::modules::profile::controller::get_profile;
use crate::routes::RouteSpec;

pub fn routes() -> Vec<RouteSpec> {
    vec![RouteSpec {
        method: Method::GET,
        path: "/api/profile",
        operation: "self:profile:get",
        handler: get(get_profile),
        middlewares: None,
        audited: false,
        summary: "Get the authenticated principal's profile",
        tags: vec!["Profile"],
    }]
}
