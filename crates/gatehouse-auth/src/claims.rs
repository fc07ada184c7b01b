use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT access token claims.
///
/// Tokens carry identity only; roles and permissions are resolved per request
/// through the permission cache so that role changes take effect without
/// re-issuing tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID, as a decimal string.
    pub sub: String,
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
