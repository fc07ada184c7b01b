//! Append-only audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Outcome bucket for an audited request: HTTP status < 400 is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "audit_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failure,
}

impl AuditStatus {
    pub fn from_http_status(status: u16) -> Self {
        if status < 400 {
            AuditStatus::Success
        } else {
            AuditStatus::Failure
        }
    }
}

/// One audit record, created exactly once per auditable request (or domain
/// event) and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub username: String,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Redacted request snapshot plus latency; omitted (not truncated) when
    /// the request body exceeded the capture cap.
    pub details: Option<Value>,
    pub status: AuditStatus,
    pub request_id: Option<String>,
    pub operation: String,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for audit log listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct AuditQuery {
    /// Maximum rows returned. Defaults to 50.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
    /// Optional action filter.
    pub action: Option<String>,
    /// Optional actor filter.
    pub user_id: Option<i64>,
}

impl AuditQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 500)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
