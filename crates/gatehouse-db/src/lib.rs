//! # Gatehouse DB
//!
//! The persistence boundary of the Gatehouse API: a PostgreSQL connection
//! pool plus the store traits the pipeline and CRUD collaborators depend on.
//!
//! The traits in [`traits`] are object-safe (`Arc<dyn ...>` in app state) and
//! come with two implementations:
//!
//! - [`postgres`]: sqlx-backed production stores
//! - [`memory`]: in-memory stores for tests and local development
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool().await;
//!     let stores = gatehouse_db::postgres::PostgresStores::new(pool);
//! }
//! ```

use std::env;

pub mod error;
pub mod memory;
pub mod postgres;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use traits::{
    AuditStore, MembershipStore, PatStore, PermissionSource, RoleStore, TaskStore, UserStore,
};

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// Called once during startup; the returned pool is cheaply cloneable and is
/// handed to the Postgres store implementations.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the connection fails.
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
