//! Poller configuration module
//!
//! Settings for the two background pollers: the order fulfillment engine
//! and the gateway inventory reconciliation job.

use serde::{Deserialize, Serialize};

/// Configuration for the order fulfillment poller
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FulfillmentConfig {
    /// How often the poller fires (in seconds)
    pub interval_seconds: u64,

    /// Orders older than this are expired and deactivated (in minutes)
    pub expiry_minutes: i64,

    /// Slack subtracted from the lookback boundary to tolerate clock skew
    /// between message ingestion and order update commits (in seconds)
    pub lookback_slack_seconds: i64,

    /// Upper bound on one tick's total runtime (in seconds)
    pub tick_timeout_seconds: u64,

    /// Job name written to the cron status heartbeat
    pub job_name: String,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 5,
            expiry_minutes: 15,
            lookback_slack_seconds: 10,
            tick_timeout_seconds: 60,
            job_name: String::from("fetch_orders"),
        }
    }
}

impl FulfillmentConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_seconds: env_u64("FULFILLMENT_INTERVAL_SECONDS", defaults.interval_seconds),
            expiry_minutes: env_i64("ORDER_EXPIRY_MINUTES", defaults.expiry_minutes),
            lookback_slack_seconds: env_i64(
                "LOOKBACK_SLACK_SECONDS",
                defaults.lookback_slack_seconds,
            ),
            tick_timeout_seconds: env_u64(
                "FULFILLMENT_TICK_TIMEOUT_SECONDS",
                defaults.tick_timeout_seconds,
            ),
            job_name: defaults.job_name,
        }
    }
}

/// Configuration for the gateway reconciliation poller
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// How often the poller fires (in seconds)
    pub interval_seconds: u64,

    /// Panel record code holding the gateway feed URL
    pub panel_code: u32,

    /// Home country ensured to exist before upserting numbers
    pub home_country: String,

    /// Port status codes treated as "active"
    pub active_status_codes: Vec<i64>,

    /// Upper bound on one tick's total runtime (in seconds)
    pub tick_timeout_seconds: u64,

    /// Timeout for the feed HTTP request (in seconds)
    pub request_timeout_seconds: u64,

    /// Job name written to the cron status heartbeat
    pub job_name: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
            panel_code: 1,
            home_country: String::from("india"),
            active_status_codes: vec![3, 7],
            tick_timeout_seconds: 60,
            request_timeout_seconds: 15,
            job_name: String::from("sync_gateway"),
        }
    }
}

impl GatewayConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_seconds: env_u64("GATEWAY_INTERVAL_SECONDS", defaults.interval_seconds),
            panel_code: std::env::var("GATEWAY_PANEL_CODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.panel_code),
            home_country: std::env::var("GATEWAY_HOME_COUNTRY")
                .unwrap_or(defaults.home_country),
            active_status_codes: defaults.active_status_codes,
            tick_timeout_seconds: env_u64(
                "GATEWAY_TICK_TIMEOUT_SECONDS",
                defaults.tick_timeout_seconds,
            ),
            request_timeout_seconds: env_u64(
                "GATEWAY_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            job_name: defaults.job_name,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
