use axum::Json;
use axum::extract::{Query, State};
use tracing::instrument;

use gatehouse_core::AppError;
use gatehouse_models::audit::{AuditQuery, AuditRecord};

use crate::state::AppState;

/// List audit records
#[utoipa::path(
    get,
    path = "/api/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit records, newest first", body = Vec<AuditRecord>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Insufficient permission")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Audit"
)]
#[instrument(skip(state))]
pub async fn list_audit_records(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditRecord>>, AppError> {
    let records = state.audit_store.list(&query).await?;
    Ok(Json(records))
}
