//! MySQL implementations of the core repository traits.
//!
//! Mutations are targeted conditional updates (`UPDATE ... WHERE`) rather
//! than read-modify-write, because the admin surface writes the same tables
//! concurrently.

mod countries;
mod cron;
mod locks;
mod messages;
mod numbers;
mod orders;
mod panels;

pub use countries::MySqlCountryRepository;
pub use cron::MySqlCronStatusRepository;
pub use locks::MySqlLockRepository;
pub use messages::MySqlMessageRepository;
pub use numbers::MySqlNumberRepository;
pub use orders::MySqlOrderRepository;
pub use panels::MySqlPanelRepository;

use sg_core::errors::DomainError;

/// Map a SQLx error onto the domain error space
pub(crate) fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Database {
        message: format!("{context}: {e}"),
    }
}
