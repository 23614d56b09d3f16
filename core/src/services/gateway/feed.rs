//! Gateway status feed schema and client contract.
//!
//! The feed is validated at the boundary: a payload without a `status`
//! array fails deserialization and the whole tick is aborted before any
//! inventory mutation.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::DomainError;

/// Top-level gateway status payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayFeed {
    /// One entry per hardware port
    pub status: Vec<PortStatus>,
}

/// One port entry from the gateway feed.
#[derive(Debug, Clone, Deserialize)]
pub struct PortStatus {
    /// 1 when a SIM is inserted in the port
    #[serde(default)]
    pub inserted: u8,

    /// SIM phone number
    #[serde(default)]
    pub sn: Option<String>,

    /// Port status code
    #[serde(default)]
    pub st: i64,

    /// Port identifier, e.g. "1.01"
    #[serde(default)]
    pub port: Option<String>,

    /// SIM card ICCID
    #[serde(default)]
    pub iccid: Option<String>,

    /// SIM IMSI
    #[serde(default)]
    pub imsi: Option<String>,

    /// Network operator name
    #[serde(default)]
    pub opr: Option<String>,

    /// Signal strength
    #[serde(default)]
    pub sig: u32,

    /// Active-port flag; 0 maps to a locked number
    #[serde(default)]
    pub active: u8,
}

impl PortStatus {
    /// Whether this entry carries a usable SIM: inserted with a phone number
    pub fn has_sim(&self) -> bool {
        self.inserted == 1 && self.sn.as_deref().is_some_and(|sn| !sn.is_empty())
    }
}

/// Contract for fetching the gateway status feed.
#[async_trait]
pub trait GatewayFeedClient: Send + Sync {
    /// Fetch and decode the feed from `url`. Network failure, a non-2xx
    /// response, or a malformed payload are all reported as errors.
    async fn fetch_status(&self, url: &str) -> Result<GatewayFeed, DomainError>;
}
