//! Stored personal access tokens.

use chrono::{DateTime, Utc};
use gatehouse_auth::PatScope;
use serde::{Deserialize, Serialize};

/// A personal access token as the store returns it, joined with the owning
/// user's username for audit attribution. Only the SHA-256 digest of the
/// token is ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatRecord {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub name: String,
    pub scopes: Vec<PatScope>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl PatRecord {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        }
    }
}
