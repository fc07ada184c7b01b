//! Route declarations.
//!
//! Each module contributes [`RouteSpec`]s; [`collect`] gathers them into the
//! single flat list the registry and the router are both built from, so the
//! operation index and the routing table can never disagree.

use axum::http::Method;
use axum::routing::MethodRouter;

use gatehouse_core::operation::{Operation, OperationParseError};
use gatehouse_core::registry::RouteEntry;

use crate::middleware::composer::MiddlewareKind;
use crate::modules;
use crate::state::AppState;

/// One route: its handler plus the metadata the registry and composer need.
///
/// `middlewares: None` selects automatic chain derivation; `Some(chain)`
/// declares the chain explicitly and is validated at startup.
pub struct RouteSpec {
    pub method: Method,
    pub path: &'static str,
    pub operation: &'static str,
    pub handler: MethodRouter<AppState>,
    pub middlewares: Option<Vec<MiddlewareKind>>,
    pub audited: bool,
    pub summary: &'static str,
    pub tags: Vec<&'static str>,
}

impl RouteSpec {
    pub fn entry(&self) -> Result<RouteEntry, OperationParseError> {
        Ok(RouteEntry {
            method: self.method.clone(),
            path: self.path.to_string(),
            operation: Operation::parse(self.operation)?,
            audited: self.audited,
            summary: self.summary,
            tags: self.tags.clone(),
        })
    }
}

/// Every route the application serves.
pub fn collect() -> Vec<RouteSpec> {
    let mut specs = Vec::new();
    specs.extend(modules::system::router::routes());
    specs.extend(modules::profile::router::routes());
    specs.extend(modules::users::router::routes());
    specs.extend(modules::roles::router::routes());
    specs.extend(modules::tasks::router::routes());
    specs.extend(modules::operations::router::routes());
    specs.extend(modules::audit::router::routes());
    specs
}
