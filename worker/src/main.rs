//! Simgate worker daemon.
//!
//! Wires the MySQL repositories and the gateway feed client into the two
//! background pollers and runs them until interrupted:
//!
//! - the order fulfillment engine (default every 5s)
//! - the gateway inventory reconciler (default every 30s)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sg_core::scheduler::Poller;
use sg_core::services::{FulfillmentService, GatewayReconciler};
use sg_infra::database::mysql::{
    MySqlCountryRepository, MySqlCronStatusRepository, MySqlLockRepository,
    MySqlMessageRepository, MySqlNumberRepository, MySqlOrderRepository, MySqlPanelRepository,
};
use sg_infra::database::DatabasePool;
use sg_infra::gateway::HttpGatewayFeedClient;
use sg_shared::{DatabaseConfig, FulfillmentConfig, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("starting simgate worker");

    let db_config = DatabaseConfig::from_env();
    let fulfillment_config = FulfillmentConfig::from_env();
    let gateway_config = GatewayConfig::from_env();

    let db = DatabasePool::new(db_config)
        .await
        .context("failed to create database pool")?;
    db.health_check().await.context("database unreachable")?;
    let pool = db.pool().clone();

    // Fulfillment engine
    let engine = Arc::new(FulfillmentService::new(
        Arc::new(MySqlOrderRepository::new(pool.clone())),
        Arc::new(MySqlMessageRepository::new(pool.clone())),
        Arc::new(MySqlLockRepository::new(pool.clone())),
        Arc::new(MySqlCronStatusRepository::new(pool.clone())),
        fulfillment_config.clone(),
    ));
    let engine_poller = Arc::new(Poller::new(
        engine,
        Duration::from_secs(fulfillment_config.interval_seconds),
    ));

    // Gateway reconciler
    let feed_client = HttpGatewayFeedClient::new(Duration::from_secs(
        gateway_config.request_timeout_seconds,
    ))
    .context("failed to build gateway feed client")?;
    let reconciler = Arc::new(GatewayReconciler::new(
        Arc::new(MySqlPanelRepository::new(pool.clone())),
        Arc::new(MySqlNumberRepository::new(pool.clone())),
        Arc::new(MySqlCountryRepository::new(pool.clone())),
        Arc::new(MySqlCronStatusRepository::new(pool.clone())),
        Arc::new(feed_client),
        gateway_config.clone(),
    ));
    let gateway_poller = Arc::new(Poller::new(
        reconciler,
        Duration::from_secs(gateway_config.interval_seconds),
    ));

    let engine_task = tokio::spawn(engine_poller.run());
    let gateway_task = tokio::spawn(gateway_poller.run());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown signal received, stopping pollers");

    engine_task.abort();
    gateway_task.abort();
    db.close().await;

    info!("simgate worker stopped");
    Ok(())
}
