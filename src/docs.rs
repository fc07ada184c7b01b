use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use gatehouse_models::AuthType;
use gatehouse_models::audit::{AuditQuery, AuditRecord, AuditStatus};
use gatehouse_models::domain::{Task, User};

use crate::modules::operations::controller::OperationInfo;
use crate::modules::profile::controller::ProfileResponse;
use crate::modules::roles::model::UpdateRolePermissionsDto;
use crate::modules::system::controller::HealthResponse;
use crate::modules::tasks::model::CreateTaskDto;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::system::controller::health,
        crate::modules::profile::controller::get_profile,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::delete_user,
        crate::modules::roles::controller::assign_role,
        crate::modules::roles::controller::unassign_role,
        crate::modules::roles::controller::update_role_permissions,
        crate::modules::tasks::controller::list_tasks,
        crate::modules::tasks::controller::create_task,
        crate::modules::operations::controller::list_operations,
        crate::modules::audit::controller::list_audit_records,
    ),
    components(
        schemas(
            HealthResponse,
            ProfileResponse,
            AuthType,
            User,
            UpdateRolePermissionsDto,
            Task,
            CreateTaskDto,
            OperationInfo,
            AuditRecord,
            AuditStatus,
            AuditQuery,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "System", description = "Service health"),
        (name = "Profile", description = "Authenticated principal"),
        (name = "Users", description = "User account administration"),
        (name = "Roles", description = "Role assignment and permission management"),
        (name = "Tasks", description = "Team-scoped task endpoints"),
        (name = "Operations", description = "Operation registry introspection"),
        (name = "Audit", description = "Audit trail access")
    ),
    info(
        title = "Gatehouse API",
        version = "0.1.0",
        description = "Multi-tenant authorization gateway: operation-based RBAC, org/team tenancy context, and asynchronous audit capture.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
