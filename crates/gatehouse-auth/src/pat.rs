//! Personal access token hashing and scope filtering.
//!
//! PATs are opaque `pat_`-prefixed strings; only a SHA-256 digest is stored,
//! so validation hashes the presented token and looks the digest up. A PAT's
//! scopes restrict which permission namespaces it can exercise: filtering is
//! a strict subset operation over the owning user's resolved permissions, and
//! an absent scope yields zero permissions from that namespace rather than
//! falling back to full access.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Token prefix that routes bearer credentials to the PAT path instead of JWT.
pub const PAT_PREFIX: &str = "pat_";

/// Enumerated PAT scopes. Each non-`full` scope names one permission
/// namespace (the first URN segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatScope {
    /// Unrestricted: the token carries the user's entire permission set.
    Full,
    #[serde(rename = "self")]
    SelfScope,
    Sys,
    Admin,
    Org,
    Team,
}

impl PatScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full" => Some(PatScope::Full),
            "self" => Some(PatScope::SelfScope),
            "sys" => Some(PatScope::Sys),
            "admin" => Some(PatScope::Admin),
            "org" => Some(PatScope::Org),
            "team" => Some(PatScope::Team),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatScope::Full => "full",
            PatScope::SelfScope => "self",
            PatScope::Sys => "sys",
            PatScope::Admin => "admin",
            PatScope::Org => "org",
            PatScope::Team => "team",
        }
    }
}

/// SHA-256 hex digest of a presented token, the stored lookup key.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Restricts a user's permissions to those the PAT scopes allow.
///
/// The result is always a subset of `permissions`: `full` keeps everything,
/// any other scope set keeps only permissions whose scope segment is named.
pub fn filter_by_scopes(scopes: &[PatScope], permissions: &[String]) -> Vec<String> {
    if scopes.contains(&PatScope::Full) {
        return permissions.to_vec();
    }

    permissions
        .iter()
        .filter(|permission| {
            let namespace = permission.split(':').next().unwrap_or("");
            scopes.iter().any(|scope| scope.as_str() == namespace)
        })
        .cloned()
        .collect()
}
