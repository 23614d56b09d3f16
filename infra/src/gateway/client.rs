//! HTTP implementation of the gateway feed client.
//!
//! Fetches the hardware-status JSON from the panel-configured URL with a
//! bounded request timeout. Any transport failure, non-2xx status, or
//! payload that does not decode into the feed schema is reported as a
//! gateway error, which the reconciler treats as tick-fatal.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use sg_core::errors::DomainError;
use sg_core::services::gateway::{GatewayFeed, GatewayFeedClient};

use crate::InfrastructureError;

/// reqwest-backed feed client.
pub struct HttpGatewayFeedClient {
    client: reqwest::Client,
}

impl HttpGatewayFeedClient {
    /// Create a client with the given request timeout
    pub fn new(request_timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(InfrastructureError::Http)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GatewayFeedClient for HttpGatewayFeedClient {
    async fn fetch_status(&self, url: &str) -> Result<GatewayFeed, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Gateway {
                message: format!("fetch failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Gateway {
                message: format!("feed returned HTTP {status}"),
            });
        }

        let feed: GatewayFeed = response.json().await.map_err(|e| DomainError::Gateway {
            message: format!("malformed feed payload: {e}"),
        })?;
        debug!(ports = feed.status.len(), "fetched gateway feed");
        Ok(feed)
    }
}
