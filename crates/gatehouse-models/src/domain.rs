//! Row types and DTOs for the representative CRUD collaborators.
//!
//! The pipeline treats these handlers as external collaborators; only the
//! models they exchange with the stores live here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A named role. `permissions` holds operation patterns, wildcards included.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: Vec<String>,
}

/// A task owned by a team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    pub id: i64,
    pub org_id: i64,
    pub team_id: i64,
    pub title: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}
