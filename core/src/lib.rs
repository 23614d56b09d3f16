//! # Simgate Core
//!
//! Core business logic and domain layer for the Simgate backend.
//! This crate contains the domain entities, the SMS template compiler,
//! the order fulfillment engine, the gateway reconciliation poller,
//! repository interfaces, and the shared error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod scheduler;
pub mod services;
pub mod template;

// Re-export commonly used types for convenience
pub use errors::{DomainError, DomainResult};
