//! # Gatehouse Cache
//!
//! Event-invalidated permission caching for the Gatehouse API.
//!
//! This crate provides:
//! - A per-user cache of resolved `(roles, permissions)` with a TTL backstop
//! - A cache-aside [`PermissionService`] over the permission source of truth
//! - Event-bus subscribers that evict entries when roles or memberships change
//! - Cache configuration from environment variables
//!
//! The cache is local to the process: coherence across nodes is out of scope,
//! and correctness relies on unconditional eviction (never partial patching)
//! driven by the domain events the CRUD layer publishes after committing
//! writes.

pub mod config;
pub mod permissions;
pub mod subscriber;

pub use config::CacheConfig;
pub use permissions::{CachedPermissions, PermissionCache, PermissionService};
pub use subscriber::register_invalidation;
