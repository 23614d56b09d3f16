//! In-memory repository implementations for testing.
//!
//! Shared by the fulfillment and gateway service test suites. Each mock
//! mirrors the behavior the MySQL implementations provide, and a few carry
//! a failure switch so error paths (heartbeat-on-failure, best-effort lock
//! emission) can be exercised.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Country, Lock, Message, Number, Panel, PortTelemetry};
use crate::errors::DomainError;

use super::countries::CountryRepository;
use super::cron::CronStatusRepository;
use super::locks::LockRepository;
use super::messages::{CandidateQuery, MessageRepository};
use super::numbers::{NumberRepository, UpsertOutcome};
use super::orders::OrderRepository;
use super::panels::PanelRepository;

use crate::domain::entities::Order;

fn injected_failure(what: &str) -> DomainError {
    DomainError::Database {
        message: format!("injected {what} failure"),
    }
}

/// Mock order repository backed by a hash map
#[derive(Default)]
pub struct MockOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    fail_find: AtomicBool,
    fail_capture: AtomicBool,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    /// Fetch a snapshot of one order
    pub async fn get(&self, id: Uuid) -> Option<Order> {
        self.orders.read().await.get(&id).cloned()
    }

    /// Make `find_active` fail until switched back off
    pub fn set_fail_find(&self, fail: bool) {
        self.fail_find.store(fail, Ordering::SeqCst);
    }

    /// Make `record_capture` fail until switched back off
    pub fn set_fail_capture(&self, fail: bool) {
        self.fail_capture.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn find_active(&self) -> Result<Vec<Order>, DomainError> {
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(injected_failure("find_active"));
        }
        let orders = self.orders.read().await;
        Ok(orders.values().filter(|o| o.active).cloned().collect())
    }

    async fn deactivate(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        if let Some(order) = orders.get_mut(&id) {
            if order.active {
                order.active = false;
                order.updated_at = now;
            }
        }
        Ok(())
    }

    async fn record_capture(
        &self,
        id: Uuid,
        body: &str,
        first_capture: bool,
        now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        if self.fail_capture.load(Ordering::SeqCst) {
            return Err(injected_failure("record_capture"));
        }
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: format!("order {id}"),
        })?;

        if order.has_message(body) {
            return Ok(false);
        }
        order.messages.push(body.to_string());
        order.next_sms = false;
        order.updated_at = now;
        if first_capture {
            order.is_used = true;
        }
        Ok(true)
    }
}

/// Mock message store
#[derive(Default)]
pub struct MockMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MockMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, message: Message) {
        self.messages.write().await.push(message);
    }
}

#[async_trait]
impl MessageRepository for MockMessageRepository {
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Message>, DomainError> {
        let full = query.full_number.to_lowercase();
        let bare = query.bare_number.to_lowercase();

        let messages = self.messages.read().await;
        let mut matched: Vec<Message> = messages
            .iter()
            .filter(|m| m.received_at > query.since)
            .filter(|m| {
                let body = m.body.to_lowercase();
                m.receiver == query.full_number
                    || m.receiver == query.bare_number
                    || body.contains(&full)
                    || body.contains(&bare)
            })
            .cloned()
            .collect();
        matched.sort_by_key(|m| m.received_at);
        Ok(matched)
    }
}

/// Mock lock store with a failure switch for the best-effort emission path
#[derive(Default)]
pub struct MockLockRepository {
    locks: Arc<RwLock<Vec<Lock>>>,
    fail_create: AtomicBool,
}

impl MockLockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Lock> {
        self.locks.read().await.clone()
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl LockRepository for MockLockRepository {
    async fn create(&self, lock: Lock) -> Result<(), DomainError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(injected_failure("lock create"));
        }
        self.locks.write().await.push(lock);
        Ok(())
    }
}

/// Mock heartbeat store
#[derive(Default)]
pub struct MockCronStatusRepository {
    runs: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MockCronStatusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn last_run(&self, name: &str) -> Option<DateTime<Utc>> {
        self.runs.read().await.get(name).copied()
    }
}

#[async_trait]
impl CronStatusRepository for MockCronStatusRepository {
    async fn record_run(&self, name: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        self.runs.write().await.insert(name.to_string(), at);
        Ok(())
    }
}

/// Mock number inventory keyed by phone number
#[derive(Default)]
pub struct MockNumberRepository {
    numbers: Arc<RwLock<HashMap<String, Number>>>,
}

impl MockNumberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, number: Number) {
        self.numbers
            .write()
            .await
            .insert(number.number.clone(), number);
    }

    pub async fn get(&self, number: &str) -> Option<Number> {
        self.numbers.read().await.get(number).cloned()
    }

    pub async fn count(&self) -> usize {
        self.numbers.read().await.len()
    }
}

#[async_trait]
impl NumberRepository for MockNumberRepository {
    async fn upsert_telemetry(
        &self,
        telemetry: &PortTelemetry,
    ) -> Result<UpsertOutcome, DomainError> {
        let mut numbers = self.numbers.write().await;
        match numbers.get_mut(&telemetry.number) {
            Some(existing) => {
                existing.apply_telemetry(telemetry);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                numbers.insert(
                    telemetry.number.clone(),
                    Number::from_telemetry(telemetry),
                );
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn deactivate_missing(&self, seen: &[String]) -> Result<u64, DomainError> {
        let mut numbers = self.numbers.write().await;
        let mut modified = 0;
        for number in numbers.values_mut() {
            if !seen.contains(&number.number) && (number.active || number.signal != 0) {
                number.active = false;
                number.signal = 0;
                modified += 1;
            }
        }
        Ok(modified)
    }
}

/// Mock panel configuration
#[derive(Default)]
pub struct MockPanelRepository {
    panel: Arc<RwLock<Option<Panel>>>,
}

impl MockPanelRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, panel: Panel) {
        *self.panel.write().await = Some(panel);
    }
}

#[async_trait]
impl PanelRepository for MockPanelRepository {
    async fn find_by_code(&self, code: u32) -> Result<Option<Panel>, DomainError> {
        let panel = self.panel.read().await;
        Ok(panel.clone().filter(|p| p.code == code))
    }
}

/// Mock country store keyed by lowercased name
#[derive(Default)]
pub struct MockCountryRepository {
    countries: Arc<RwLock<HashMap<String, Country>>>,
}

impl MockCountryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.countries.read().await.len()
    }
}

#[async_trait]
impl CountryRepository for MockCountryRepository {
    async fn get_or_create(&self, name: &str) -> Result<Country, DomainError> {
        let key = name.to_lowercase();
        let mut countries = self.countries.write().await;
        Ok(countries
            .entry(key.clone())
            .or_insert_with(|| Country::new(&key))
            .clone())
    }
}
