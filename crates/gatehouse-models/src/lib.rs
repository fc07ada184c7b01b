//! # Gatehouse Models
//!
//! Domain models shared between the pipeline, the store layer, and handlers:
//!
//! - [`principal`]: the authenticated actor resolved per request
//! - [`tenancy`]: org/team roles, memberships, and request-scoped context values
//! - [`audit`]: append-only audit records and list queries
//! - [`pats`]: stored personal access tokens
//! - [`domain`]: row types for the representative CRUD collaborators

pub mod audit;
pub mod domain;
pub mod pats;
pub mod principal;
pub mod tenancy;

pub use audit::{AuditQuery, AuditRecord, AuditStatus};
pub use pats::PatRecord;
pub use principal::{AuthType, CurrentUser};
pub use tenancy::{OrgMembership, OrgRole, OrgScope, Team, TeamMembership, TeamRole, TeamScope};
