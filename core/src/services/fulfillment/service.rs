//! Fulfillment engine implementation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use sg_shared::FulfillmentConfig;

use crate::domain::entities::{Lock, Order};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{
    CandidateQuery, CronStatusRepository, LockRepository, MessageRepository, OrderRepository,
};
use crate::scheduler::PollerJob;
use crate::template::{passes_keyword_filter, TemplateSet};

/// What happened to one order during one tick.
///
/// Everything except `Captured` is steady-state control flow, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// Older than the expiry threshold; deactivated
    Expired,
    /// Positive message cap reached; skipped but left active
    CapReached,
    /// One-shot order that already holds its code
    Fulfilled,
    /// Multi-use order waiting for the external gap timer to reopen the gate
    GateClosed,
    /// No candidate message matched this tick
    NoMatch,
    /// An OTP was captured from a candidate message
    Captured { otp: String },
}

/// The polling engine driving order fulfillment.
pub struct FulfillmentService<O, M, L, C>
where
    O: OrderRepository,
    M: MessageRepository,
    L: LockRepository,
    C: CronStatusRepository,
{
    orders: Arc<O>,
    messages: Arc<M>,
    locks: Arc<L>,
    cron: Arc<C>,
    config: FulfillmentConfig,
}

impl<O, M, L, C> FulfillmentService<O, M, L, C>
where
    O: OrderRepository,
    M: MessageRepository,
    L: LockRepository,
    C: CronStatusRepository,
{
    /// Create a new fulfillment engine over the given stores
    pub fn new(
        orders: Arc<O>,
        messages: Arc<M>,
        locks: Arc<L>,
        cron: Arc<C>,
        config: FulfillmentConfig,
    ) -> Self {
        Self {
            orders,
            messages,
            locks,
            cron,
            config,
        }
    }

    /// Process every active order once.
    ///
    /// Errors scoped to one order are logged and do not abort the tick for
    /// the others; an error loading the order list is tick-fatal.
    async fn process_orders(&self) -> DomainResult<()> {
        let orders = self.orders.find_active().await?;
        debug!(count = orders.len(), "loaded active orders");

        for order in &orders {
            match self.process_order(order).await {
                Ok(OrderOutcome::Captured { otp }) => {
                    info!(order_id = %order.id, otp = %otp, "captured OTP");
                }
                Ok(OrderOutcome::Expired) => {
                    info!(order_id = %order.id, "order expired, deactivated");
                }
                Ok(outcome) => {
                    debug!(order_id = %order.id, ?outcome, "order skipped");
                }
                Err(e) => {
                    warn!(order_id = %order.id, error = %e, "order processing failed, continuing");
                }
            }
        }
        Ok(())
    }

    /// Run the state machine for one order.
    pub async fn process_order(&self, order: &Order) -> DomainResult<OrderOutcome> {
        let now = Utc::now();

        if order.age_since(now) > Duration::minutes(self.config.expiry_minutes) {
            self.orders.deactivate(order.id, now).await?;
            return Ok(OrderOutcome::Expired);
        }

        if order.is_soft_capped() {
            return Ok(OrderOutcome::CapReached);
        }

        let matchers = TemplateSet::compile(&order.templates);

        let query = CandidateQuery {
            full_number: order.full_number(),
            bare_number: order.number.clone(),
            since: order.lookback_since(Duration::seconds(self.config.lookback_slack_seconds)),
        };
        let candidates = self.messages.find_candidates(&query).await?;
        debug!(order_id = %order.id, count = candidates.len(), "candidate messages");

        if order.has_captured() {
            if !order.is_multi_use {
                return Ok(OrderOutcome::Fulfilled);
            }
            if !order.next_sms {
                return Ok(OrderOutcome::GateClosed);
            }
        }

        for message in &candidates {
            if order.has_message(&message.body) {
                debug!(order_id = %order.id, "message already captured, skipping");
                continue;
            }
            if !passes_keyword_filter(&message.body, &order.keywords) {
                debug!(order_id = %order.id, "keywords not matched, skipping");
                continue;
            }
            let Some(otp) = matchers.extract(&message.body) else {
                debug!(order_id = %order.id, sender = %message.sender, "no template matched");
                continue;
            };

            let first_capture = !order.has_captured();
            self.orders
                .record_capture(order.id, &message.body, first_capture, now)
                .await?;

            if first_capture {
                self.emit_lock(order).await;
            }

            // At most one capture per order per tick
            return Ok(OrderOutcome::Captured { otp });
        }

        Ok(OrderOutcome::NoMatch)
    }

    /// Best-effort lock emission on the first captured OTP.
    ///
    /// A failed write is logged and otherwise ignored; the order mutation
    /// stands. There is no retry and no read-back.
    async fn emit_lock(&self, order: &Order) {
        let lock = Lock::new(order.number.clone(), order.country_id, order.service_id);
        if let Err(e) = self.locks.create(lock).await {
            error!(order_id = %order.id, error = %e, "failed to write lock record");
        }
    }
}

#[async_trait]
impl<O, M, L, C> PollerJob for FulfillmentService<O, M, L, C>
where
    O: OrderRepository,
    M: MessageRepository,
    L: LockRepository,
    C: CronStatusRepository,
{
    fn name(&self) -> &str {
        &self.config.job_name
    }

    async fn run_tick(&self) -> DomainResult<()> {
        let budget = std::time::Duration::from_secs(self.config.tick_timeout_seconds);
        let result = match tokio::time::timeout(budget, self.process_orders()).await {
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
