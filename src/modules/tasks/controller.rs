use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::instrument;

use gatehouse_core::AppError;
use gatehouse_models::CurrentUser;
use gatehouse_models::domain::Task;
use gatehouse_models::tenancy::{OrgScope, TeamScope};

use crate::modules::tasks::model::CreateTaskDto;
use crate::modules::tasks::service::TaskService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List a team's tasks
#[utoipa::path(
    get,
    path = "/api/orgs/{org_id}/teams/{team_id}/tasks",
    params(
        ("org_id" = i64, Path, description = "Organization id"),
        ("team_id" = i64, Path, description = "Team id")
    ),
    responses(
        (status = 200, description = "Tasks in the team", body = Vec<Task>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Not a member of the organization"),
        (status = 404, description = "Team not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(org): Extension<OrgScope>,
    Extension(team): Extension<TeamScope>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = TaskService::list_tasks(&state.tasks, org.org_id, team.team_id).await?;
    Ok(Json(tasks))
}

/// Create a task in a team
#[utoipa::path(
    post,
    path = "/api/orgs/{org_id}/teams/{team_id}/tasks",
    params(
        ("org_id" = i64, Path, description = "Organization id"),
        ("team_id" = i64, Path, description = "Team id")
    ),
    request_body = CreateTaskDto,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Not a member of the team"),
        (status = 404, description = "Team not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Tasks"
)]
#[instrument(skip(state, dto))]
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Extension(org): Extension<OrgScope>,
    Extension(team): Extension<TeamScope>,
    ValidatedJson(dto): ValidatedJson<CreateTaskDto>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = TaskService::create_task(
        &state.tasks,
        org.org_id,
        team.team_id,
        &dto.title,
        user.user_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(task)))
}
