//! Order entity: a rented phone number awaiting a one-time code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order entity representing a unit of fulfillment work
///
/// Orders are created externally with `active = true` and a list of
/// human-authored SMS templates. From that point on only the fulfillment
/// engine mutates them: captured message bodies are appended with set
/// semantics, and the `active` flag is cleared when the order expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier for the order
    pub id: Uuid,

    /// Rented phone number (digits only, no dial code)
    pub number: String,

    /// International dial code without the leading `+`
    pub dial_code: String,

    /// Country this number belongs to
    pub country_id: Uuid,

    /// Service the code is expected from
    pub service_id: Uuid,

    /// Set once the first OTP has been captured; never reset by the engine
    pub is_used: bool,

    /// Whether the order may capture more than one code
    pub is_multi_use: bool,

    /// Gate for accepting the next code on a multi-use order. Closed by the
    /// engine on every capture; reopened by an external gap timer.
    pub next_sms: bool,

    /// Captured message bodies, append-only, deduplicated by exact text
    pub messages: Vec<String>,

    /// Keyword filters; empty list accepts every message
    pub keywords: Vec<String>,

    /// Template strings the compiler turns into matchers
    pub templates: Vec<String>,

    /// Maximum number of captured messages (0 = unlimited)
    pub max_messages: u32,

    /// Whether the order still participates in polling
    pub active: bool,

    /// Timestamp when the order was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new active order for the given number and service
    pub fn new(
        number: String,
        dial_code: String,
        country_id: Uuid,
        service_id: Uuid,
        templates: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            number,
            dial_code,
            country_id,
            service_id,
            is_used: false,
            is_multi_use: true,
            next_sms: false,
            messages: Vec::new(),
            keywords: Vec::new(),
            templates,
            max_messages: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full dialed form of the number, e.g. `+919876543210`
    pub fn full_number(&self) -> String {
        format!("+{}{}", self.dial_code, self.number)
    }

    /// Age of the order relative to `now`
    pub fn age_since(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Whether a positive message cap has been reached
    ///
    /// Capped orders stay active and are skipped every tick until expiry.
    pub fn is_soft_capped(&self) -> bool {
        self.max_messages > 0 && self.messages.len() >= self.max_messages as usize
    }

    /// Whether at least one message has been captured
    pub fn has_captured(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Whether this exact body has already been captured
    pub fn has_message(&self, body: &str) -> bool {
        self.messages.iter().any(|m| m == body)
    }

    /// Start of the candidate-message lookback window: the later of
    /// `created_at`/`updated_at` minus a slack tolerating clock skew between
    /// message ingestion and order update commits.
    pub fn lookback_since(&self, slack: Duration) -> DateTime<Utc> {
        self.created_at.max(self.updated_at) - slack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order() -> Order {
        Order::new(
            "9876543210".to_string(),
            "91".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            vec!["Your OTP is {otp}".to_string()],
        )
    }

    #[test]
    fn test_new_order_defaults() {
        let order = test_order();
        assert!(order.active);
        assert!(!order.is_used);
        assert!(order.is_multi_use);
        assert!(!order.next_sms);
        assert!(order.messages.is_empty());
        assert_eq!(order.max_messages, 0);
    }

    #[test]
    fn test_full_number() {
        let order = test_order();
        assert_eq!(order.full_number(), "+919876543210");
    }

    #[test]
    fn test_soft_cap() {
        let mut order = test_order();
        assert!(!order.is_soft_capped(), "cap 0 means unlimited");

        order.max_messages = 2;
        assert!(!order.is_soft_capped());

        order.messages.push("first".to_string());
        order.messages.push("second".to_string());
        assert!(order.is_soft_capped());
    }

    #[test]
    fn test_lookback_uses_later_timestamp() {
        let mut order = test_order();
        order.updated_at = order.created_at + Duration::minutes(3);

        let since = order.lookback_since(Duration::seconds(10));
        assert_eq!(since, order.updated_at - Duration::seconds(10));

        // A stale updated_at never pulls the window before creation
        order.updated_at = order.created_at - Duration::minutes(3);
        let since = order.lookback_since(Duration::seconds(10));
        assert_eq!(since, order.created_at - Duration::seconds(10));
    }

    #[test]
    fn test_has_message_exact_text() {
        let mut order = test_order();
        order.messages.push("Your OTP is 1234".to_string());
        assert!(order.has_message("Your OTP is 1234"));
        assert!(!order.has_message("your otp is 1234"));
    }
}
