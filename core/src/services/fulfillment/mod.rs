//! Order fulfillment engine.
//!
//! Every tick loads the active orders, finds newly arrived candidate
//! messages for each, runs the template matchers, and drives the per-order
//! state machine: expiry, soft cap, multi-use gating, capture, lock
//! emission.

mod service;

#[cfg(test)]
mod tests;

pub use service::{FulfillmentService, OrderOutcome};
