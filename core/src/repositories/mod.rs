//! Repository traits defining the data contracts between the pollers and
//! the storage layer.
//!
//! The traits are async-first and keep the abstraction boundary between
//! domain and infrastructure: the fulfillment engine and the gateway
//! reconciler only ever see these interfaces. Concrete MySQL
//! implementations live in the infra crate; in-memory implementations for
//! tests live in [`mock`].

pub mod countries;
pub mod cron;
pub mod locks;
pub mod messages;
pub mod mock;
pub mod numbers;
pub mod orders;
pub mod panels;

pub use countries::CountryRepository;
pub use cron::CronStatusRepository;
pub use locks::LockRepository;
pub use messages::{CandidateQuery, MessageRepository};
pub use numbers::{NumberRepository, UpsertOutcome};
pub use orders::OrderRepository;
pub use panels::PanelRepository;
