use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Replacement permission set for a role. Each entry is an operation pattern,
/// wildcards allowed per segment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRolePermissionsDto {
    #[validate(length(min = 1, message = "At least one permission pattern is required"))]
    pub permissions: Vec<String>,
}
