//! Gateway reconciliation implementation.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use sg_shared::GatewayConfig;

use crate::domain::entities::PortTelemetry;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{
    CountryRepository, CronStatusRepository, NumberRepository, PanelRepository, UpsertOutcome,
};
use crate::scheduler::PollerJob;

use super::feed::GatewayFeedClient;

/// The reconciliation poller: feed in, inventory out.
pub struct GatewayReconciler<P, N, C, S, F>
where
    P: PanelRepository,
    N: NumberRepository,
    C: CountryRepository,
    S: CronStatusRepository,
    F: GatewayFeedClient,
{
    panels: Arc<P>,
    numbers: Arc<N>,
    countries: Arc<C>,
    cron: Arc<S>,
    client: Arc<F>,
    config: GatewayConfig,
}

impl<P, N, C, S, F> GatewayReconciler<P, N, C, S, F>
where
    P: PanelRepository,
    N: NumberRepository,
    C: CountryRepository,
    S: CronStatusRepository,
    F: GatewayFeedClient,
{
    /// Create a new reconciler over the given stores and feed client
    pub fn new(
        panels: Arc<P>,
        numbers: Arc<N>,
        countries: Arc<C>,
        cron: Arc<S>,
        client: Arc<F>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            panels,
            numbers,
            countries,
            cron,
            client,
            config,
        }
    }

    /// One reconciliation pass.
    ///
    /// A missing panel record, an unreachable feed, or a malformed payload
    /// abort the pass before any inventory mutation. Per-port upsert
    /// failures are recoverable and do not stop the sweep.
    async fn reconcile(&self) -> DomainResult<()> {
        let panel = self
            .panels
            .find_by_code(self.config.panel_code)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("panel record (code {})", self.config.panel_code),
            })?;
        if panel.url.is_empty() {
            return Err(DomainError::Validation {
                message: format!("panel {} has an empty gateway URL", panel.code),
            });
        }
        debug!(url = %panel.url, "using gateway URL");

        let feed = self.client.fetch_status(&panel.url).await?;

        let country = self.countries.get_or_create(&self.config.home_country).await?;

        let now = Utc::now();
        let mut seen = Vec::new();
        for port in feed.status.iter().filter(|p| p.has_sim()) {
            let Some(number) = port.sn.as_deref() else {
                continue;
            };
            seen.push(number.to_string());

            let is_active = self.config.active_status_codes.contains(&port.st);
            let telemetry = PortTelemetry {
                number: number.to_string(),
                country_id: country.id,
                port: port.port.clone(),
                iccid: port.iccid.clone(),
                imsi: port.imsi.clone(),
                operator: port.opr.clone(),
                signal: if is_active { port.sig } else { 0 },
                locked: port.active == 0,
                last_rotation: now,
                active: is_active,
            };

            match self.numbers.upsert_telemetry(&telemetry).await {
                Ok(UpsertOutcome::Inserted) => {
                    info!(number = %number, port = ?port.port, "added new number");
                }
                Ok(UpsertOutcome::Updated) => {
                    debug!(number = %number, port = ?port.port, "updated number");
                }
                Err(e) => {
                    warn!(number = %number, error = %e, "number upsert failed, continuing");
                }
            }
        }

        let swept = self.numbers.deactivate_missing(&seen).await?;
        if swept > 0 {
            info!(count = swept, "marked numbers absent from the feed as inactive");
        }
        info!(ports = feed.status.len(), synced = seen.len(), "gateway sync complete");
        Ok(())
    }
}

#[async_trait]
impl<P, N, C, S, F> PollerJob for GatewayReconciler<P, N, C, S, F>
where
    P: PanelRepository,
    N: NumberRepository,
    C: CountryRepository,
    S: CronStatusRepository,
    F: GatewayFeedClient,
{
    fn name(&self) -> &str {
        &self.config.job_name
    }

    async fn run_tick(&self) -> DomainResult<()> {
        let budget = std::time::Duration::from_secs(self.config.tick_timeout_seconds);
        let result = match tokio::time::timeout(budget, self.reconcile()).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::Internal {
                message: format!("tick exceeded {}s budget", self.config.tick_timeout_seconds),
            }),
        };

        // Liveness heartbeat on every tick, success or failure
        if let Err(e) = self.cron.record_run(&self.config.job_name, Utc::now()).await {
            error!(job = %self.config.job_name, error = %e, "failed to record heartbeat");
        }

        result
    }
}
