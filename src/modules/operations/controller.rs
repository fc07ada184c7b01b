use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::state::AppState;

/// One registered operation, as exposed to administrators.
#[derive(Serialize, ToSchema)]
pub struct OperationInfo {
    pub operation: String,
    pub method: String,
    pub path: String,
    pub category: String,
    pub public: bool,
    pub audited: bool,
    pub summary: &'static str,
}

/// List registered operations
#[utoipa::path(
    get,
    path = "/api/operations",
    responses(
        (status = 200, description = "All registered operations", body = Vec<OperationInfo>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Insufficient permission")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Operations"
)]
#[instrument(skip(state))]
pub async fn list_operations(State(state): State<AppState>) -> Json<Vec<OperationInfo>> {
    let mut operations: Vec<OperationInfo> = state
        .registry
        .operations()
        .map(|meta| OperationInfo {
            operation: meta.operation.as_str().to_string(),
            method: meta.method.to_string(),
            path: meta.path.clone(),
            category: meta.category.clone(),
            public: meta.is_public,
            audited: meta.audited,
            summary: meta.summary,
        })
        .collect();
    operations.sort_by(|a, b| a.operation.cmp(&b.operation));
    Json(operations)
}
