use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use gatehouse_core::AppError;

use crate::modules::roles::model::UpdateRolePermissionsDto;
use crate::modules::roles::service::RoleService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Assign a role to a user
#[utoipa::path(
    post,
    path = "/api/users/{user_id}/roles/{role_id}",
    params(
        ("user_id" = i64, Path, description = "User id"),
        ("role_id" = i64, Path, description = "Role id")
    ),
    responses(
        (status = 204, description = "Role assigned"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Insufficient permission"),
        (status = 404, description = "User or role not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn assign_role(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    RoleService::assign_role(&state.roles, &state.users, &state.events, user_id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a role from a user
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/roles/{role_id}",
    params(
        ("user_id" = i64, Path, description = "User id"),
        ("role_id" = i64, Path, description = "Role id")
    ),
    responses(
        (status = 204, description = "Role removed"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Insufficient permission"),
        (status = 404, description = "Role not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn unassign_role(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    RoleService::unassign_role(&state.roles, &state.events, user_id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace a role's permission patterns
#[utoipa::path(
    put,
    path = "/api/roles/{role_id}/permissions",
    params(
        ("role_id" = i64, Path, description = "Role id")
    ),
    request_body = UpdateRolePermissionsDto,
    responses(
        (status = 204, description = "Permissions replaced"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Insufficient permission"),
        (status = 404, description = "Role not found"),
        (status = 422, description = "Malformed permission patterns")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Roles"
)]
#[instrument(skip(state, dto))]
pub async fn update_role_permissions(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateRolePermissionsDto>,
) -> Result<StatusCode, AppError> {
    for pattern in &dto.permissions {
        if !well_formed_pattern(pattern) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Malformed permission pattern: {pattern:?}"
            )));
        }
    }

    RoleService::update_permissions(&state.roles, &state.events, role_id, dto.permissions).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A grantable pattern: three non-empty segments, `*` allowed per segment.
fn well_formed_pattern(pattern: &str) -> bool {
    let segments: Vec<&str> = pattern.split(':').collect();
    segments.len() == 3 && segments.iter().all(|seg| !seg.is_empty())
}
