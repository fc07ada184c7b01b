//! Team membership resolution, with admin bypass.
//!
//! Requires org context. The team must exist and belong to the resolved org
//! (404 otherwise — a team id from another org is indistinguishable from a
//! missing one). Org owners and admins may act on any team in their org:
//! membership is still looked up so handlers see a team role when there is
//! one, but its absence does not fail the request. Everyone else must be a
//! member, except on optional (read-only) routes.

use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};

use gatehouse_core::AppError;
use gatehouse_models::{CurrentUser, OrgScope, TeamScope};

use crate::middleware::ordering_error;
use crate::middleware::org_context::path_param_i64;
use crate::state::AppState;

pub async fn team_context(
    state: State<AppState>,
    params: RawPathParams,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    resolve(state, params, req, next, false).await
}

pub async fn team_context_optional(
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
        return Err(ordering_error("team_context", "auth"));
    };
    let Some(org) = req.extensions().get::<OrgScope>().cloned() else {
        return Err(ordering_error("team_context", "org_context"));
    };

    let team_id = path_param_i64(&params, "team_id")
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid team id")))?;

    let team = state
        .memberships
        .team(team_id)
        .await?
        .filter(|team| team.org_id == org.org_id)
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Team not found")))?;

    let membership = state
        .memberships
        .team_membership(team.id, user.user_id)
        .await?;

    let team_role = match membership {
        Some(membership) => Some(membership.role),
        None if org.role.bypasses_team_membership() || optional => None,
        None => {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You are not a member of this team"
            )));
        }
    };

    req.extensions_mut().insert(TeamScope {
        team_id: team.id,
        role: team_role,
    });

    Ok(next.run(req).await)
}
