//! Configuration module with per-concern sub-modules
//!
//! - `database` - MySQL connection and pool configuration
//! - `poller` - Fulfillment engine and gateway reconciliation poller settings

pub mod database;
pub mod poller;

pub use database::DatabaseConfig;
pub use poller::{FulfillmentConfig, GatewayConfig};
