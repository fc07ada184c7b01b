//! The per-route request pipeline.
//!
//! Every protected route runs an ordered chain of middleware assembled by the
//! [`composer`]; each stage validates one concern and injects a strongly
//! typed value into the request extensions for later stages and the handler:
//!
//! 1. [`request_id`]: correlation id
//! 2. [`operation`]: the route's [`gatehouse_core::Operation`]
//! 3. [`auth`]: the authenticated [`gatehouse_models::CurrentUser`]
//! 4. [`org_context`] / [`team_context`]: tenant membership
//! 5. [`rbac`]: permission enforcement against the operation string
//! 6. [`audit`]: asynchronous outcome capture
//!
//! Ordering is structural: the composer validates chains at startup, and each
//! stage treats a missing upstream value as a 500 programmer error, never a
//! user-facing 4xx.

pub mod audit;
pub mod auth;
pub mod composer;
pub mod operation;
pub mod org_context;
pub mod rbac;
pub mod request_id;
pub mod team_context;

use gatehouse_core::AppError;
use tracing::error;

/// A required upstream middleware did not run: the chain was mis-declared.
pub(crate) fn ordering_error(stage: &str, missing: &str) -> AppError {
    error!(stage, missing, "Middleware ordering violation");
    AppError::internal(anyhow::anyhow!("Internal server error"))
}
