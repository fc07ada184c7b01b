use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use gatehouse_core::{AppError, Operation};

use crate::middleware::ordering_error;
use crate::state::AppState;

/// The operation resolved for the matched route, injected for RBAC and audit
/// capture.
#[derive(Debug, Clone)]
pub struct RouteOperation(pub Operation);

/// Looks the matched route up in the operation registry and injects its
/// [`Operation`]. A route that composes this middleware but was never
/// registered is a startup wiring bug, reported as a 500.
pub async fn operation_id(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(matched) = req.extensions().get::<MatchedPath>() else {
        return Err(ordering_error("operation_id", "matched path"));
    };

    let operation = state
        .registry
        .operation_for(req.method(), matched.as_str())
        .cloned()
        .ok_or_else(|| ordering_error("operation_id", "registry entry"))?;

    req.extensions_mut().insert(RouteOperation(operation));
    Ok(next.run(req).await)
}
