//! Background services: the order fulfillment engine and the gateway
//! inventory reconciler.

pub mod fulfillment;
pub mod gateway;

pub use fulfillment::FulfillmentService;
pub use gateway::GatewayReconciler;
