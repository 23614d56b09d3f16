//! Gateway inventory reconciliation.
//!
//! Polls the hardware gateway's status feed and reconciles per-port SIM
//! telemetry into the number inventory. Numbers absent from a feed report
//! are treated as gone and deactivated.

mod feed;
mod service;


pub use feed::{GatewayFeed, GatewayFeedClient, PortStatus};
pub use service::GatewayReconciler;
