//! Gateway status feed client.

mod client;

pub use client::HttpGatewayFeedClient;
