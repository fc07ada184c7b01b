use axum::extract::{Path, State};
use axum::{Json, http::StatusCode};
use tracing::instrument;

use gatehouse_core::AppError;
use gatehouse_models::domain::User;

use crate::modules::users::service::UserService;
use crate::state::AppState;

/// List user accounts
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All user accounts", body = Vec<User>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Insufficient permission")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::get_users(&state.users).await?;
    Ok(Json(users))
}

/// Delete a user account
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Insufficient permission"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.users, &state.events, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
