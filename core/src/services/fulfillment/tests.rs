//! Fulfillment engine test suite over the in-memory repositories.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use sg_shared::FulfillmentConfig;

use crate::domain::entities::{Message, Order};
use crate::errors::DomainError;
use crate::repositories::mock::{
    MockCronStatusRepository, MockLockRepository, MockMessageRepository, MockOrderRepository,
};
use crate::repositories::OrderRepository;
use crate::scheduler::PollerJob;

use super::{FulfillmentService, OrderOutcome};

type TestService = FulfillmentService<
    MockOrderRepository,
    MockMessageRepository,
    MockLockRepository,
    MockCronStatusRepository,
>;

struct Fixture {
    orders: Arc<MockOrderRepository>,
    messages: Arc<MockMessageRepository>,
    locks: Arc<MockLockRepository>,
    cron: Arc<MockCronStatusRepository>,
    service: TestService,
}

fn fixture() -> Fixture {
    let orders = Arc::new(MockOrderRepository::new());
    let messages = Arc::new(MockMessageRepository::new());
    let locks = Arc::new(MockLockRepository::new());
    let cron = Arc::new(MockCronStatusRepository::new());
    let service = FulfillmentService::new(
        orders.clone(),
        messages.clone(),
        locks.clone(),
        cron.clone(),
        FulfillmentConfig::default(),
    );
    Fixture {
        orders,
        messages,
        locks,
        cron,
        service,
    }
}

fn test_order() -> Order {
    Order::new(
        "9876543210".to_string(),
        "91".to_string(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        vec!["Your OTP is {otp}".to_string()],
    )
}

fn message_for(order: &Order, body: &str) -> Message {
    Message::new("ACMEBK".to_string(), order.full_number(), body.to_string())
}

#[tokio::test]
async fn test_capture_sets_used_and_emits_lock() {
    let f = fixture();
    let order = test_order();
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 482991"))
        .await;

    f.service.run_tick().await.unwrap();

    let stored = f.orders.get(id).await.unwrap();
    assert_eq!(stored.messages, vec!["Your OTP is 482991".to_string()]);
    assert!(stored.is_used);
    assert!(!stored.next_sms, "capture closes the gate");

    let locks = f.locks.all().await;
    assert_eq!(locks.len(), 1);
    assert_eq!(locks[0].number, "9876543210");
    assert!(locks[0].locked);
}

#[tokio::test]
async fn test_same_message_is_captured_only_once() {
    let f = fixture();
    let order = test_order();
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 482991"))
        .await;

    f.service.run_tick().await.unwrap();

    // Simulate the external gap timer reopening the multi-use gate, then
    // deliver the exact same body again
    let mut reopened = f.orders.get(id).await.unwrap();
    reopened.next_sms = true;
    f.orders.insert(reopened).await;
    f.messages
        .insert(message_for(&test_order(), "Your OTP is 482991"))
        .await;

    let order = f.orders.get(id).await.unwrap();
    let outcome = f.service.process_order(&order).await.unwrap();

    assert_eq!(outcome, OrderOutcome::NoMatch, "duplicate body is skipped");
    let stored = f.orders.get(id).await.unwrap();
    assert_eq!(stored.messages.len(), 1);
}

#[tokio::test]
async fn test_capped_order_never_grows_past_cap() {
    let f = fixture();
    let mut order = test_order();
    order.max_messages = 2;
    order.messages = vec!["one".to_string(), "two".to_string()];
    order.next_sms = true;
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 333444"))
        .await;

    for _ in 0..3 {
        f.service.run_tick().await.unwrap();
    }

    let stored = f.orders.get(id).await.unwrap();
    assert_eq!(stored.messages.len(), 2, "third message never appended");
    assert!(stored.active, "soft cap leaves the order active");
}

#[tokio::test]
async fn test_stale_order_expires() {
    let f = fixture();
    let mut order = test_order();
    order.created_at = Utc::now() - Duration::minutes(16);
    order.updated_at = order.created_at;
    let id = order.id;
    f.orders.insert(order.clone()).await;
    // Even with a qualifying message waiting, expiry wins
    f.messages
        .insert(message_for(&order, "Your OTP is 482991"))
        .await;

    f.service.run_tick().await.unwrap();

    let stored = f.orders.get(id).await.unwrap();
    assert!(!stored.active);
    assert!(stored.messages.is_empty(), "expired order captures nothing");
}

#[tokio::test]
async fn test_at_most_one_capture_per_tick() {
    let f = fixture();
    let order = test_order();
    let id = order.id;
    f.orders.insert(order.clone()).await;

    let mut first = message_for(&order, "Your OTP is 111111");
    first.received_at = Utc::now() - Duration::seconds(2);
    let second = message_for(&order, "Your OTP is 222222");
    f.messages.insert(second).await;
    f.messages.insert(first).await;

    f.service.run_tick().await.unwrap();

    let stored = f.orders.get(id).await.unwrap();
    assert_eq!(
        stored.messages,
        vec!["Your OTP is 111111".to_string()],
        "earliest qualifying message wins, one capture per tick"
    );
}

#[tokio::test]
async fn test_one_shot_order_is_not_reprocessed() {
    let f = fixture();
    let mut order = test_order();
    order.is_multi_use = false;
    order.is_used = true;
    order.messages = vec!["Your OTP is 111111".to_string()];
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 999999"))
        .await;

    let stored = f.orders.get(id).await.unwrap();
    let outcome = f.service.process_order(&stored).await.unwrap();

    assert_eq!(outcome, OrderOutcome::Fulfilled);
    assert_eq!(f.orders.get(id).await.unwrap().messages.len(), 1);
}

#[tokio::test]
async fn test_multi_use_waits_for_gate() {
    let f = fixture();
    let mut order = test_order();
    order.is_used = true;
    order.messages = vec!["Your OTP is 111111".to_string()];
    order.next_sms = false;
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 999999"))
        .await;

    let stored = f.orders.get(id).await.unwrap();
    let outcome = f.service.process_order(&stored).await.unwrap();

    assert_eq!(outcome, OrderOutcome::GateClosed);
    assert_eq!(f.orders.get(id).await.unwrap().messages.len(), 1);
}

#[tokio::test]
async fn test_second_capture_through_open_gate() {
    let f = fixture();
    let mut order = test_order();
    order.is_used = true;
    order.messages = vec!["Your OTP is 111111".to_string()];
    order.next_sms = true;
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 999999"))
        .await;

    f.service.run_tick().await.unwrap();

    let stored = f.orders.get(id).await.unwrap();
    assert_eq!(stored.messages.len(), 2);
    assert!(!stored.next_sms, "gate closes again after the capture");
    assert!(
        f.locks.all().await.is_empty(),
        "lock is only emitted on the first capture"
    );
}

#[tokio::test]
async fn test_keyword_filter_blocks_capture() {
    let f = fixture();
    let mut order = test_order();
    order.keywords = vec!["acme".to_string()];
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 482991"))
        .await;

    let stored = f.orders.get(id).await.unwrap();
    let outcome = f.service.process_order(&stored).await.unwrap();

    assert_eq!(outcome, OrderOutcome::NoMatch);

    // A message carrying the keyword passes
    f.messages
        .insert(message_for(&order, "Acme alert: Your OTP is 482991"))
        .await;
    let outcome = f.service.process_order(&stored).await.unwrap();
    assert_eq!(
        outcome,
        OrderOutcome::Captured {
            otp: "482991".to_string()
        }
    );
}

#[tokio::test]
async fn test_message_referencing_number_in_body_qualifies() {
    let f = fixture();
    let order = test_order();
    let id = order.id;
    f.orders.insert(order.clone()).await;

    // Receiver is some shortcode; the body references the full number
    let message = Message::new(
        "ACMEBK".to_string(),
        "VK-ACMEBK".to_string(),
        format!("Your OTP is 775533 for {}", order.full_number()),
    );
    f.messages.insert(message).await;

    f.service.run_tick().await.unwrap();

    assert_eq!(f.orders.get(id).await.unwrap().messages.len(), 1);
}

#[tokio::test]
async fn test_message_before_lookback_window_is_ignored() {
    let f = fixture();
    let order = test_order();
    let id = order.id;
    f.orders.insert(order.clone()).await;

    let mut stale = message_for(&order, "Your OTP is 482991");
    stale.received_at = order.created_at - Duration::seconds(30);
    f.messages.insert(stale).await;

    f.service.run_tick().await.unwrap();

    assert!(f.orders.get(id).await.unwrap().messages.is_empty());
}

#[tokio::test]
async fn test_heartbeat_recorded_even_when_tick_fails() {
    let f = fixture();
    f.orders.set_fail_find(true);

    let result = f.service.run_tick().await;

    assert!(result.is_err());
    assert!(
        f.cron.last_run("fetch_orders").await.is_some(),
        "heartbeat written on the failure path"
    );
}

/// Order store whose reads never resolve, stalling the tick body
struct StalledOrderRepository;

#[async_trait]
impl OrderRepository for StalledOrderRepository {
    async fn find_active(&self) -> Result<Vec<Order>, DomainError> {
        std::future::pending().await
    }

    async fn deactivate(&self, _id: Uuid, _now: DateTime<Utc>) -> Result<(), DomainError> {
        Ok(())
    }

    async fn record_capture(
        &self,
        _id: Uuid,
        _body: &str,
        _first_capture: bool,
        _now: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        Ok(false)
    }
}

#[tokio::test(start_paused = true)]
async fn test_tick_timeout_is_a_failure_with_heartbeat() {
    let cron = Arc::new(MockCronStatusRepository::new());
    let service = FulfillmentService::new(
        Arc::new(StalledOrderRepository),
        Arc::new(MockMessageRepository::new()),
        Arc::new(MockLockRepository::new()),
        cron.clone(),
        FulfillmentConfig {
            tick_timeout_seconds: 1,
            ..FulfillmentConfig::default()
        },
    );

    let result = service.run_tick().await;

    assert!(result.is_err(), "exceeding the tick budget fails the tick");
    assert!(
        cron.last_run("fetch_orders").await.is_some(),
        "heartbeat written even when the tick times out"
    );
}

#[tokio::test]
async fn test_lock_failure_does_not_roll_back_capture() {
    let f = fixture();
    let order = test_order();
    let id = order.id;
    f.orders.insert(order.clone()).await;
    f.messages
        .insert(message_for(&order, "Your OTP is 482991"))
        .await;
    f.locks.set_fail_create(true);

    f.service.run_tick().await.unwrap();

    let stored = f.orders.get(id).await.unwrap();
    assert_eq!(stored.messages.len(), 1, "capture stands");
    assert!(stored.is_used);
    assert!(f.locks.all().await.is_empty());
}

#[tokio::test]
async fn test_failure_in_one_order_does_not_block_others() {
    let f = fixture();

    // This order will fail at record_capture
    let failing = test_order();
    f.orders.insert(failing.clone()).await;
    f.messages
        .insert(message_for(&failing, "Your OTP is 482991"))
        .await;

    // This one just needs to expire
    let mut expiring = Order::new(
        "9000000001".to_string(),
        "91".to_string(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        vec!["code {otp}".to_string()],
    );
    expiring.created_at = Utc::now() - Duration::minutes(20);
    expiring.updated_at = expiring.created_at;
    let expiring_id = expiring.id;
    f.orders.insert(expiring).await;

    f.orders.set_fail_capture(true);
    f.service.run_tick().await.unwrap();

    assert!(
        !f.orders.get(expiring_id).await.unwrap().active,
        "second order still processed after the first errored"
    );
}
