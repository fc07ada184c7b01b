//! Organization membership resolution.
//!
//! Requires the auth middleware to have run. Parses the `org_id` path
//! parameter, verifies membership, and injects [`OrgScope`]. Non-members get
//! a 403 rather than 404 so the response does not reveal whether the org
//! exists; the optional variant lets the request proceed without an
//! `OrgScope` instead (admin views that list orgs regardless of membership).

use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};

use gatehouse_core::AppError;
use gatehouse_models::{CurrentUser, OrgScope};

use crate::middleware::ordering_error;
use crate::state::AppState;

pub async fn org_context(
    state: State<AppState>,
    params: RawPathParams,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    resolve(state, params, req, next, false).await
}

pub async fn org_context_optional(
    state: State<AppState>,
    params: RawPathParams,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    resolve(state, params, req, next, true).await
}

async fn resolve(
    State(state): State<AppState>,
    params: RawPathParams,
    mut req: Request,
    next: Next,
    optional: bool,
) -> Result<Response, AppError> {
    let Some(user) = req.extensions().get::<CurrentUser>().cloned() else {
        return Err(ordering_error("org_context", "auth"));
    };

    let org_id = path_param_i64(&params, "org_id")
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid organization id")))?;

    match state.memberships.org_membership(org_id, user.user_id).await? {
        Some(membership) => {
            req.extensions_mut().insert(OrgScope {
                org_id,
                role: membership.role,
            });
        }
        None if optional => {}
        None => {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You do not have access to this organization"
            )));
        }
    }

    Ok(next.run(req).await)
}

pub(crate) fn path_param_i64(params: &RawPathParams, name: &str) -> Option<i64> {
    params
        .iter()
        .find(|(key, _)| *key == name)
        .and_then(|(_, value)| value.parse().ok())
}
