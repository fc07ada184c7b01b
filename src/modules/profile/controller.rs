use axum::{Extension, Json};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use gatehouse_models::{AuthType, CurrentUser};

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub auth_type: AuthType,
}

/// Get the authenticated principal's resolved profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Resolved principal", body = ProfileResponse),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
#[instrument(skip(user))]
pub async fn get_profile(Extension(user): Extension<CurrentUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        user_id: user.user_id,
        username: user.username,
        roles: user.roles,
        permissions: user.permissions,
        auth_type: user.auth_type,
    })
}
