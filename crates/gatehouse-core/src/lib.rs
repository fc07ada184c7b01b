//! # Gatehouse Core
//!
//! Core types shared across the Gatehouse API:
//!
//! - The [`Operation`](operation::Operation) permission URN and wildcard matcher
//! - The immutable [`OperationRegistry`](registry::OperationRegistry) built at startup
//! - The in-process [`EventBus`](events::EventBus) for domain events
//! - The [`AppError`](error::AppError) HTTP error type

pub mod error;
pub mod events;
pub mod operation;
pub mod registry;

pub use error::AppError;
pub use events::{DomainEvent, EventBus, topics};
pub use operation::{Operation, OperationParseError, Scope, matches};
pub use registry::{OperationMeta, OperationRegistry, RegistryError};
