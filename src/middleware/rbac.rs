//! Permission enforcement.
//!
//! The last gate before the handler: allows iff any of the principal's
//! effective permission patterns matches the route's operation string.
//! Public operations never carry this middleware, and the rejection body
//! never echoes the operation that failed.

use axum::{extract::Request, middleware::Next, response::Response};

use gatehouse_core::AppError;
use gatehouse_models::CurrentUser;

use crate::middleware::operation::RouteOperation;
use crate::middleware::ordering_error;

pub async fn rbac(req: Request, next: Next) -> Result<Response, AppError> {
    let Some(RouteOperation(operation)) = req.extensions().get::<RouteOperation>() else {
        return Err(ordering_error("rbac", "operation_id"));
    };
    let Some(user) = req.extensions().get::<CurrentUser>() else {
        return Err(ordering_error("rbac", "auth"));
    };

    if !user.can(operation.as_str()) {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Insufficient permission"
        )));
    }

    Ok(next.run(req).await)
}
