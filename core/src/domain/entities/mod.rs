//! Persistent entities shared between the pollers and the storage layer.

pub mod country;
pub mod cron_status;
pub mod lock;
pub mod message;
pub mod number;
pub mod order;
pub mod panel;

pub use country::Country;
pub use cron_status::CronStatus;
pub use lock::Lock;
pub use message::Message;
pub use number::{Number, PortTelemetry};
pub use order::Order;
pub use panel::Panel;
