//! Operation identifiers and the wildcard permission matcher.
//!
//! An [`Operation`] is the canonical `"{scope}:{resource}:{action}"` string
//! identifying both a route's intent and its required permission. RBAC checks
//! a principal's granted patterns against the operation string itself; there
//! is no separate permission table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of colon-separated segments in a well-formed operation or pattern.
const SEGMENTS: usize = 3;

/// The scope segment of an operation, governing which context and auth the
/// route needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// No authentication required.
    Public,
    /// Scoped to the acting user.
    SelfScope,
    /// Privileged administrative access.
    Admin,
    /// System-level access.
    Sys,
    /// Organization-scoped access.
    Org,
    /// Team-scoped access (implies organization scope).
    Team,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Public => "public",
            Scope::SelfScope => "self",
            Scope::Admin => "admin",
            Scope::Sys => "sys",
            Scope::Org => "org",
            Scope::Team => "team",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Scope::Public),
            "self" => Some(Scope::SelfScope),
            "admin" => Some(Scope::Admin),
            "sys" => Some(Scope::Sys),
            "org" => Some(Scope::Org),
            "team" => Some(Scope::Team),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OperationParseError {
    #[error("operation must have exactly {SEGMENTS} segments: {0:?}")]
    SegmentCount(String),
    #[error("operation has an empty segment: {0:?}")]
    EmptySegment(String),
    #[error("unknown operation scope: {0:?}")]
    UnknownScope(String),
}

/// Canonical `scope:resource:action` permission identifier.
///
/// Immutable once constructed; registered into the [`crate::OperationRegistry`]
/// at startup and used literally as the RBAC permission string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operation(String);

impl Operation {
    pub fn parse(s: &str) -> Result<Self, OperationParseError> {
        let segments: Vec<&str> = s.split(':').collect();
        if segments.len() != SEGMENTS {
            return Err(OperationParseError::SegmentCount(s.to_string()));
        }
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(OperationParseError::EmptySegment(s.to_string()));
        }
        if Scope::parse(segments[0]).is_none() {
            return Err(OperationParseError::UnknownScope(segments[0].to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scope(&self) -> Scope {
        // Validated in `parse`.
        Scope::parse(self.segment(0)).unwrap_or(Scope::Admin)
    }

    /// The resource (middle) segment, used as the audit category.
    pub fn resource(&self) -> &str {
        self.segment(1)
    }

    /// The action (last) segment, used as the audit action.
    pub fn action(&self) -> &str {
        self.segment(2)
    }

    pub fn is_public(&self) -> bool {
        self.scope() == Scope::Public
    }

    fn segment(&self, idx: usize) -> &str {
        self.0.split(':').nth(idx).unwrap_or("")
    }
}

impl FromStr for Operation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::parse(s)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Matches a granted permission pattern against an operation string.
///
/// Both sides split on `:` into exactly three segments; a pattern segment is
/// either `*` (matches anything) or must equal the operation segment exactly.
/// Malformed patterns (or operations) with a different segment count never
/// match.
pub fn matches(pattern: &str, operation: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(':').collect();
    let operation: Vec<&str> = operation.split(':').collect();

    if pattern.len() != SEGMENTS || operation.len() != SEGMENTS {
        return false;
    }

    pattern
        .iter()
        .zip(operation.iter())
        .all(|(p, o)| *p == "*" || p == o)
}

/// True if any pattern in the set grants the operation.
pub fn any_matches<S: AsRef<str>>(patterns: &[S], operation: &str) -> bool {
    patterns.iter().any(|p| matches(p.as_ref(), operation))
}
