//! # Gatehouse Auth
//!
//! Credential validation primitives used by the auth middleware:
//!
//! - JWT claims plus token creation/verification ([`jwt`])
//! - Personal access token hashing and scope filtering ([`pat`])
//!
//! Credential issuance (login flows, PAT minting UIs) lives outside this
//! system; these are the validation-side building blocks only.

pub mod claims;
pub mod jwt;
pub mod pat;

pub use claims::Claims;
pub use jwt::{JwtConfig, create_access_token, verify_token};
pub use pat::{PAT_PREFIX, PatScope, filter_by_scopes, hash_token};
