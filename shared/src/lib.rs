//! # Simgate Shared
//!
//! Shared configuration types for the Simgate backend. Every config struct
//! carries sensible defaults and a `from_env()` constructor so the worker
//! binary can be configured entirely through environment variables.

pub mod config;

pub use config::{DatabaseConfig, FulfillmentConfig, GatewayConfig};
