use std::sync::Arc;

use gatehouse_core::AppError;
use gatehouse_db::TaskStore;
use gatehouse_models::domain::Task;

pub struct TaskService;

impl TaskService {
    pub async fn list_tasks(
        store: &Arc<dyn TaskStore>,
        org_id: i64,
        team_id: i64,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = store.list_for_team(org_id, team_id).await?;
        Ok(tasks)
    }

    pub async fn create_task(
        store: &Arc<dyn TaskStore>,
        org_id: i64,
        team_id: i64,
        title: &str,
        created_by: i64,
    ) -> Result<Task, AppError> {
        let task = store.create(org_id, team_id, title, created_by).await?;
        Ok(task)
    }
}
